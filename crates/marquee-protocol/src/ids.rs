//! String newtypes for page-level identifiers.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Define a transparent string identifier type.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

id_type!(
    /// Identifier of a registered overlay.
    OverlayId
);
id_type!(
    /// Identifier of a carousel.
    CarouselId
);
id_type!(
    /// Identifier of a form.
    FormId
);
id_type!(
    /// Name of a field within a form.
    FieldName
);
id_type!(
    /// Identifier of a page element.
    ElementId
);
