//! Enum types for registration fields.
//!
//! Each enum has:
//! - Serialize/Deserialize as its camelCase wire string
//! - a `Custom(String)` catch-all so unknown values survive loading
//! - `as_str()`, `is_builtin()`, `Display`

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Macro: defines an enum with known string variants + a Custom(String) fallback.
// ---------------------------------------------------------------------------
macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident,
        variants: [
            $( ($variant:ident, $str:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            Custom(String),
        }

        impl $name {
            /// Returns the string representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $str, )+
                    Self::Custom(s) => s.as_str(),
                }
            }

            /// Returns `true` if this is a built-in (non-custom) variant.
            pub fn is_builtin(&self) -> bool {
                !matches!(self, Self::Custom(_))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from(s))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $( $str => Self::$variant, )+
                    other => Self::Custom(other.to_owned()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match s.as_str() {
                    $( $str => Self::$variant, )+
                    _ => Self::Custom(s),
                }
            }
        }
    };
}

define_enum!(
    /// Input widget kind of a registration field.
    FieldType, default = Text,
    variants: [
        (Text, "text"),
        (Number, "number"),
        (Boolean, "boolean"),
        (Option, "option"),
        (CheckBoxGroup, "checkBoxGroup"),
        (RadioButtonGroup, "radioButtonGroup"),
    ]
);

impl FieldType {
    /// Returns `true` for field types that need an `options` list.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            Self::Option | Self::CheckBoxGroup | Self::RadioButtonGroup
        )
    }
}

define_enum!(
    /// Where a field's value comes from.
    ValueType, default = UserInput,
    variants: [
        (UserInput, "userInput"),
        (Fixed, "fixed"),
        (Dynamic, "dynamic"),
    ]
);

impl ValueType {
    /// Only user-input fields accept edits from the registrant.
    pub fn is_editable(&self) -> bool {
        *self == Self::UserInput
    }
}
