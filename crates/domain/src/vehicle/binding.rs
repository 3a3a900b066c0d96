use uuid::Uuid;

use crate::tag::Tag;

/// Planned mutation of the tag-vehicle binding relation.
///
/// Computed by the binding manager and applied atomically by the unit of
/// work. At every commit point the binding relation must remain a valid
/// bijection over the vehicles and tags touched; the storage layer backs
/// this with a uniqueness constraint on the binding column.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingChange {
    /// Point `vehicle_id` at a tag that is unbound (or already its own).
    /// `new_tag` carries the tag row to insert when the code was unknown.
    Bind {
        vehicle_id: Uuid,
        tag_id: Uuid,
        new_tag: Option<Tag>,
    },

    /// The new tag is bound to another vehicle: exchange the two bindings
    /// in one transaction. No durable state may show both vehicles on one
    /// tag or the target vehicle with no tag.
    Swap {
        vehicle_id: Uuid,
        new_tag_id: Uuid,
        other_vehicle_id: Uuid,
        old_tag_id: Uuid,
    },
}
