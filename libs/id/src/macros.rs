//! The `define_id!` macro.

/// Defines a prefixed, ULID-backed identifier type.
///
/// The generated newtype carries:
/// - a `PREFIX` constant,
/// - `new()` for minting a fresh id and `parse()` for strict parsing,
/// - `Display`/`FromStr` using the canonical `{prefix}_{ulid}` form,
/// - string-based `Serialize`/`Deserialize`,
/// - `Ord`/`Hash` so ids work as map keys and sort by creation time.
///
/// # Example
///
/// ```ignore
/// define_id!(PersonId, "psn");
///
/// let id = PersonId::new();
/// let same: PersonId = id.to_string().parse()?;
/// assert_eq!(id, same);
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($crate::Ulid);

        impl $name {
            /// Canonical prefix for this identifier type.
            pub const PREFIX: &'static str = $prefix;

            /// Mints a fresh identifier.
            #[must_use]
            pub fn new() -> Self {
                Self($crate::Ulid::new())
            }

            /// Wraps an existing ULID.
            #[must_use]
            pub const fn from_ulid(ulid: $crate::Ulid) -> Self {
                Self(ulid)
            }

            /// The underlying ULID.
            #[must_use]
            pub const fn ulid(&self) -> $crate::Ulid {
                self.0
            }

            /// Millisecond timestamp baked into the ULID; ids mint in
            /// ascending `created_at_ms` order.
            #[must_use]
            pub fn created_at_ms(&self) -> u64 {
                self.0.timestamp_ms()
            }

            /// Parses the canonical `{prefix}_{ulid}` form.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                if s.is_empty() {
                    return Err($crate::IdError::Empty);
                }

                let Some((prefix, payload)) = s.split_once('_') else {
                    return Err($crate::IdError::MissingPrefix {
                        expected: Self::PREFIX,
                        found: s.to_string(),
                    });
                };

                if prefix != Self::PREFIX {
                    return Err($crate::IdError::WrongPrefix {
                        expected: Self::PREFIX,
                        found: prefix.to_string(),
                    });
                }

                let ulid = payload
                    .parse::<$crate::Ulid>()
                    .map_err(|e| $crate::IdError::BadUlid(e.to_string()))?;

                Ok(Self(ulid))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}_{}", Self::PREFIX, self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }

        impl AsRef<$crate::Ulid> for $name {
            fn as_ref(&self) -> &$crate::Ulid {
                &self.0
            }
        }
    };
}
