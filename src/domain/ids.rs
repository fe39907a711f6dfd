// Typed document identifiers.
//
// Each seeding step hands back the id it produced as its own type, so a step
// can only be called with the ids of the writes it depends on.

use std::fmt;

macro_rules! document_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

document_id!(UserId);
document_id!(FarmerId);
document_id!(CropId);
document_id!(DiagnosisId);
document_id!(ProductId);
