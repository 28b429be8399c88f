//! Helper macro for creating "bitflag" types.

use thiserror::Error;

/// Creates an integer wrapper that can be used for "flags".
macro_rules! bitflags {
	(
		$(#[$outer_meta:meta])*
		$vis:vis $name:ident as $repr:ty {
			$(
				$(#[$variant_meta:meta])*
				$variant:ident = { $value:expr, $variant_name:literal };
			)*
		}
	) => {
		$(#[$outer_meta])*
		#[derive(
			Debug,
			Default,
			Clone,
			Copy,
			PartialEq,
			Eq,
			::serde::Serialize,
			::serde::Deserialize,
			::sqlx::Type,
		)]
		#[serde(transparent)]
		#[sqlx(transparent)]
		$vis struct $name($repr);

		#[allow(dead_code)]
		impl $name {
			pub const fn new(value: $repr) -> Self {
				Self(value & Self::ALL.0)
			}

			pub const fn value(self) -> $repr {
				self.0
			}

			pub const fn name(self) -> Option<&'static str> {
				match self {
					$(
						Self::$variant => Some($variant_name),
					)*
					_ => None,
				}
			}

			pub const fn contains(self, other: Self) -> bool {
				(self.0 & other.0) == other.0
			}

			pub const NONE: Self = Self(0);

			$(
				$(#[$variant_meta])*
				pub const $variant: Self = Self($value);
			)*

			const ALL: Self = Self(0 $(| Self::$variant.0)*);
		}

		impl ::std::str::FromStr for $name {
			type Err = $crate::bitflags::UnknownFlag;

			fn from_str(value: &str) -> ::std::result::Result<Self, <Self as ::std::str::FromStr>::Err> {
				match value {
					$(
						$variant_name => Ok(Self::$variant),
					)*
					unknown => Err($crate::bitflags::UnknownFlag(unknown.to_owned())),
				}
			}
		}

		impl ::std::ops::Deref for $name {
			type Target = $repr;

			fn deref(&self) -> &<Self as ::std::ops::Deref>::Target {
				&self.0
			}
		}

		impl ::std::ops::BitOr for $name {
			type Output = Self;

			fn bitor(self, rhs: Self) -> Self::Output {
				Self(self.0 | rhs.0)
			}
		}

		impl ::std::ops::BitOrAssign for $name {
			fn bitor_assign(&mut self, rhs: Self) {
				self.0 |= rhs.0;
			}
		}
	};
}

pub(crate) use bitflags;

/// An unknown flag name was parsed.
#[derive(Debug, Error)]
#[error("`{0}` is not a known flag")]
pub struct UnknownFlag(pub String);
