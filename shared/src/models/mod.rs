//! Domain models shared across the workspace

mod entity;
mod member;
mod partnership;

pub use entity::{Entity, EntityStatus, EntityType};
pub use member::{Gender, Member, MemberDraft, MemberStatus};
pub use partnership::Partnership;
