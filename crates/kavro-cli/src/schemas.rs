//! `User` schemas compiled into the binaries, used unless `--schema-dir` is
//! given.

use std::path::Path;

use kavro_client::{Result, SchemaVariant, UserSchema};

const SPECIFIC: &str = include_str!("../avro/user_specific.avsc");
const GENERIC: &str = include_str!("../avro/user_generic.avsc");

pub fn bundled(variant: SchemaVariant) -> Result<UserSchema> {
    let text = match variant {
        SchemaVariant::Specific => SPECIFIC,
        SchemaVariant::Generic => GENERIC,
    };
    UserSchema::from_text(
        Path::new("<bundled>").join(variant.file_name()),
        variant,
        text,
    )
}

/// Load from `dir` when given, otherwise use the bundled schema.
pub fn load(dir: Option<&Path>, variant: SchemaVariant) -> Result<UserSchema> {
    match dir {
        Some(dir) => UserSchema::load(dir, variant),
        None => bundled(variant),
    }
}
