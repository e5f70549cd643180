//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access_grant;
mod blend;
mod directory;
mod field_type;

pub use access_grant::AccessGrant;
pub use blend::{
    BlendDefinition, BlendDefinitionInput, BlendField, BlendFieldInput, BlendFieldKind,
    is_snake_case,
};
pub use directory::{
    ADVANCED_FILTER_STRING_TYPE, ALL_USERS_GROUP_ID, DirectoryUser, Group, Role, UserAttribute,
    intersect_model_groups, referenced_group_ids,
};
pub use field_type::SourceFieldType;
