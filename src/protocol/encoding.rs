use log::warn;
use thiserror::Error;

/// A value outside of a lookup table's domain was asked to be encoded (or
/// parsed from text).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("value is not in the {table} table")]
pub struct UnknownSymbol {
    pub table: &'static str,
}

/// A wire byte has no symbol in its lookup table.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown {table} code 0x{code:02x}")]
pub struct UnknownCode {
    pub table: &'static str,
    pub code: u8,
}

/// Immutable two-way mapping between symbols of one field domain and their
/// single byte wire codes.
///
/// Domains are small, so both directions are a linear scan over the entries.
#[derive(Debug)]
pub struct LookupTable<S: 'static> {
    name: &'static str,
    entries: &'static [(S, u8)],
}

impl<S: 'static> LookupTable<S> {
    pub const fn new(name: &'static str, entries: &'static [(S, u8)]) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Copy + PartialEq + 'static> LookupTable<S> {
    pub fn encode(&self, symbol: S) -> Result<u8, UnknownSymbol> {
        self.entries
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, code)| *code)
            .ok_or(UnknownSymbol { table: self.name })
    }

    pub fn try_decode(&self, code: u8) -> Result<S, UnknownCode> {
        self.entries
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(s, _)| *s)
            .ok_or(UnknownCode { table: self.name, code })
    }

    /// Like [`LookupTable::try_decode`], but an unknown code is only logged.
    /// Units report codes outside of the known domains, and those must not
    /// take the session down.
    pub fn decode(&self, code: u8) -> Option<S> {
        match self.try_decode(code) {
            Ok(symbol) => Some(symbol),
            Err(e) => {
                warn!("Failed to look up {}", e);
                None
            }
        }
    }

    pub fn symbols(&self) -> impl Iterator<Item = S> + '_ {
        self.entries.iter().map(|(s, _)| *s)
    }
}

/// A value of a field domain that has a lookup table.
pub trait Symbol: Copy + PartialEq + 'static {
    fn table() -> &'static LookupTable<Self>;

    fn encoded_as_byte(&self) -> Result<u8, UnknownSymbol> {
        Self::table().encode(*self)
    }

    fn decoded_from_byte(code: u8) -> Option<Self> {
        Self::table().decode(code)
    }
}

/// Declares a symbolic enum together with its lookup table, its wire-protocol
/// names and `Display`/`FromStr` impls over those names.
macro_rules! symbol_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident in $table:ident ($label:literal) {
            $( $variant:ident = $code:literal => $text:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $( $variant ),*
        }

        pub static $table: $crate::protocol::encoding::LookupTable<$name> =
            $crate::protocol::encoding::LookupTable::new(
                $label,
                &[ $( ($name::$variant, $code) ),* ],
            );

        impl $name {
            pub fn name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),*
                }
            }
        }

        impl $crate::protocol::encoding::Symbol for $name {
            fn table() -> &'static $crate::protocol::encoding::LookupTable<Self> {
                &$table
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl core::str::FromStr for $name {
            type Err = $crate::protocol::encoding::UnknownSymbol;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $table
                    .symbols()
                    .find(|symbol| symbol.name().eq_ignore_ascii_case(s))
                    .ok_or($crate::protocol::encoding::UnknownSymbol { table: $label })
            }
        }
    };
}
