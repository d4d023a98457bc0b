//! Resource model.
//!
//! Resources are the physical units a booking occupies: parking slots and
//! three kinds of essential-device bundles. Every unit of a type is
//! interchangeable; the pool sizing fixes how many units exist.
//!
//! | Id | Type | Units |
//! |----|------|-------|
//! | 0 | Parking slot | `N` |
//! | 1 | Battery + cable | `K` |
//! | 2 | Locker + umbrella | `K` |
//! | 3 | Valet parking + inflation service | `K` |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RequestError;

/// Resource type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ResourceType {
    /// Parking slot (type 0).
    ParkingSlot,
    /// Battery and charging cable (type 1).
    BatteryCable,
    /// Locker and umbrella (type 2).
    LockerUmbrella,
    /// Valet parking and tyre inflation service (type 3).
    ValetInflation,
}

impl ResourceType {
    /// All types in id order.
    pub const ALL: [ResourceType; 4] = [
        ResourceType::ParkingSlot,
        ResourceType::BatteryCable,
        ResourceType::LockerUmbrella,
        ResourceType::ValetInflation,
    ];

    /// The three essential-device types (ids 1..=3).
    pub const ESSENTIALS: [ResourceType; 3] = [
        ResourceType::BatteryCable,
        ResourceType::LockerUmbrella,
        ResourceType::ValetInflation,
    ];

    /// Numeric id in `0..=3`.
    #[inline]
    pub fn id(self) -> u8 {
        match self {
            ResourceType::ParkingSlot => 0,
            ResourceType::BatteryCable => 1,
            ResourceType::LockerUmbrella => 2,
            ResourceType::ValetInflation => 3,
        }
    }

    /// Looks up a type by its numeric id.
    pub fn from_id(id: u8) -> Result<Self, RequestError> {
        match id {
            0 => Ok(ResourceType::ParkingSlot),
            1 => Ok(ResourceType::BatteryCable),
            2 => Ok(ResourceType::LockerUmbrella),
            3 => Ok(ResourceType::ValetInflation),
            other => Err(RequestError::UnknownResourceType(other)),
        }
    }

    /// Array index for per-type storage.
    #[inline]
    pub fn index(self) -> usize {
        self.id() as usize
    }

    /// Whether this is one of the essential-device types.
    #[inline]
    pub fn is_essential(self) -> bool {
        self != ResourceType::ParkingSlot
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ResourceType::ParkingSlot => "parking slot",
            ResourceType::BatteryCable => "battery+cable",
            ResourceType::LockerUmbrella => "locker+umbrella",
            ResourceType::ValetInflation => "valet+inflation",
        }
    }
}

impl TryFrom<u8> for ResourceType {
    type Error = RequestError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        ResourceType::from_id(id)
    }
}

impl From<ResourceType> for u8 {
    fn from(rt: ResourceType) -> Self {
        rt.id()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of resource types, stored as a 4-bit mask.
///
/// Iteration is always in ascending id order, which fixes the order in
/// which placement searches the per-type instance lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct ResourceSet(u8);

impl ResourceSet {
    /// The empty set.
    pub const fn empty() -> Self {
        ResourceSet(0)
    }

    /// Adds a type to the set.
    pub fn insert(&mut self, rt: ResourceType) {
        self.0 |= 1 << rt.id();
    }

    /// Returns the set with `rt` added.
    pub fn with(mut self, rt: ResourceType) -> Self {
        self.insert(rt);
        self
    }

    /// Whether `rt` is in the set.
    #[inline]
    pub fn contains(self, rt: ResourceType) -> bool {
        self.0 & (1 << rt.id()) != 0
    }

    /// Number of types in the set.
    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of essential-device types in the set.
    pub fn essential_count(self) -> usize {
        ResourceType::ESSENTIALS
            .iter()
            .filter(|&&rt| self.contains(rt))
            .count()
    }

    /// Iterates the types in ascending id order.
    pub fn iter(self) -> impl Iterator<Item = ResourceType> {
        ResourceType::ALL
            .into_iter()
            .filter(move |&rt| self.contains(rt))
    }
}

impl FromIterator<ResourceType> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = ResourceType>>(iter: I) -> Self {
        let mut set = ResourceSet::empty();
        for rt in iter {
            set.insert(rt);
        }
        set
    }
}

impl TryFrom<Vec<u8>> for ResourceSet {
    type Error = RequestError;

    fn try_from(ids: Vec<u8>) -> Result<Self, Self::Error> {
        ids.into_iter().map(ResourceType::from_id).collect()
    }
}

impl From<ResourceSet> for Vec<u8> {
    fn from(set: ResourceSet) -> Self {
        set.iter().map(ResourceType::id).collect()
    }
}

impl fmt::Display for ResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, rt) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", rt.id())?;
        }
        f.write_str("}")
    }
}

/// Number of instances per resource type.
///
/// `parking_slots` is `N`, `essential_units` is `K` (applied to each of
/// the three essential types).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSizing {
    /// Instances of type 0.
    pub parking_slots: usize,
    /// Instances of each of types 1..=3.
    pub essential_units: usize,
}

impl Default for PoolSizing {
    fn default() -> Self {
        Self {
            parking_slots: 10,
            essential_units: 3,
        }
    }
}

impl PoolSizing {
    /// Creates a sizing with `n` parking slots and `k` units per essential type.
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            parking_slots: n,
            essential_units: k,
        }
    }

    /// Sets the number of parking slots.
    pub fn with_parking_slots(mut self, n: usize) -> Self {
        self.parking_slots = n;
        self
    }

    /// Sets the number of units per essential type.
    pub fn with_essential_units(mut self, k: usize) -> Self {
        self.essential_units = k;
        self
    }

    /// Instance count for a resource type.
    #[inline]
    pub fn instances_of(&self, rt: ResourceType) -> usize {
        match rt {
            ResourceType::ParkingSlot => self.parking_slots,
            _ => self.essential_units,
        }
    }

    /// Total instance count: `N + 3K`.
    #[inline]
    pub fn total_instances(&self) -> usize {
        self.parking_slots + 3 * self.essential_units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_ids() {
        for (i, rt) in ResourceType::ALL.iter().enumerate() {
            assert_eq!(rt.index(), i);
            assert_eq!(ResourceType::from_id(i as u8), Ok(*rt));
        }
        assert_eq!(
            ResourceType::from_id(4),
            Err(RequestError::UnknownResourceType(4))
        );
        assert!(!ResourceType::ParkingSlot.is_essential());
        assert!(ResourceType::LockerUmbrella.is_essential());
    }

    #[test]
    fn test_resource_set_ops() {
        let set: ResourceSet = [ResourceType::ValetInflation, ResourceType::ParkingSlot]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(ResourceType::ParkingSlot));
        assert!(!set.contains(ResourceType::BatteryCable));
        assert_eq!(set.essential_count(), 1);
        assert!(!set.is_empty());
        assert!(ResourceSet::empty().is_empty());
    }

    #[test]
    fn test_resource_set_iterates_ascending() {
        let set = ResourceSet::empty()
            .with(ResourceType::ValetInflation)
            .with(ResourceType::BatteryCable)
            .with(ResourceType::ParkingSlot);
        let ids: Vec<u8> = set.iter().map(ResourceType::id).collect();
        assert_eq!(ids, vec![0, 1, 3]);
        assert_eq!(set.to_string(), "{0, 1, 3}");
    }

    #[test]
    fn test_resource_set_serde() {
        let set = ResourceSet::empty()
            .with(ResourceType::ParkingSlot)
            .with(ResourceType::LockerUmbrella);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[0,2]");

        let err = serde_json::from_str::<ResourceSet>("[0,7]");
        assert!(err.is_err());
    }

    #[test]
    fn test_pool_sizing() {
        let sizing = PoolSizing::default();
        assert_eq!(sizing.parking_slots, 10);
        assert_eq!(sizing.essential_units, 3);
        assert_eq!(sizing.total_instances(), 19);

        let small = PoolSizing::new(1, 1);
        assert_eq!(small.instances_of(ResourceType::ParkingSlot), 1);
        assert_eq!(small.instances_of(ResourceType::ValetInflation), 1);
        assert_eq!(small.total_instances(), 4);

        let custom = PoolSizing::default()
            .with_parking_slots(4)
            .with_essential_units(2);
        assert_eq!(custom.total_instances(), 10);
    }

    #[test]
    fn test_pool_sizing_serde_defaults() {
        let sizing: PoolSizing = serde_json::from_str(r#"{"parking_slots": 5}"#).unwrap();
        assert_eq!(sizing, PoolSizing::new(5, 3));
    }
}
