//! A small macro implementing the "enum-or-int" pattern (SPEC_FULL.md §3,
//! §9) for the small code fields nested inside payloads (move functions,
//! motor status, lock functions, ...). Mirrors the same idea as
//! `sdn_core::NodeType`/`MessageId`/`NackReason`, just generated once per
//! field instead of hand-written, since payloads carry a dozen or so of
//! these small enumerations.

macro_rules! enum_or_int {
    (
        $(#[$meta:meta])*
        pub enum $name:ident($known:ident) : u8 {
            $( $variant:ident = $value:expr ),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[repr(u8)]
        pub enum $known {
            $( $variant = $value ),+
        }

        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            Known($known),
            Raw(u8),
        }

        impl From<u8> for $name {
            fn from(value: u8) -> Self {
                match value {
                    $( $value => $name::Known($known::$variant), )+
                    other => $name::Raw(other),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                match value {
                    $name::Known(known) => known as u8,
                    $name::Raw(raw) => raw,
                }
            }
        }
    };
}

pub(crate) use enum_or_int;
