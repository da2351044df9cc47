//! Macros for defining kind enums.

/// Macro for defining a kind enum.
///
/// Kinds are stored as their numeric code, render as
/// `SCREAMING_SNAKE_CASE` and parse case-insensitively.
///
/// # Example
///
/// ```rust
/// # use common::define_kind;
///
/// define_kind! {
///     #[doc = "Lesson difficulty."]
///     enum Difficulty {
///         #[doc = "For newcomers."]
///         Beginner = 1,
///
///         #[doc = "For fluent signers."]
///         Advanced = 2,
///     }
/// }
///
/// assert_eq!("advanced".parse::<Difficulty>(), Ok(Difficulty::Advanced));
/// assert_eq!(Difficulty::from_u8(1), Some(Difficulty::Beginner));
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::serde::Deserialize,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
            $crate::private::serde::Serialize,
        )]
        #[doc = $doc]
        #[repr(u8)]
        #[serde(crate = "::common::private::serde")]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        #[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant = $value,
            )*
        }

        impl $name {
            /// Converts this into its [`u8`] representation.
            #[must_use]
            pub const fn u8(self) -> u8 {
                self as u8
            }

            /// Converts the provided [`u8`] representation back, if it
            /// denotes any variant.
            #[must_use]
            pub fn from_u8(code: u8) -> Option<Self> {
                match code {
                    $(
                        v if Self::$variant.u8() == v => Some(Self::$variant),
                    )*
                    _ => None,
                }
            }
        }

        #[cfg(feature = "postgres")]
        impl<'a> $crate::private::postgres_types::FromSql<'a> for $name {
            $crate::private::postgres_types::accepts!(INT2);

            fn from_sql(
                ty: &$crate::private::postgres_types::Type,
                raw: &[u8],
            ) -> Result<
                $name,
                Box<dyn ::std::error::Error
                    + ::core::marker::Sync
                    + ::core::marker::Send>,
            > {
                let code = <i16 as $crate::private::postgres_types::FromSql>
                    ::from_sql(ty, raw)?;
                let code = u8::try_from(code)?;
                Self::from_u8(code).ok_or_else(|| ::std::format!(
                    "invalid `{}` value: {code}",
                    ::core::stringify!($name),
                ).into())
            }
        }

        #[cfg(feature = "postgres")]
        impl $crate::private::postgres_types::ToSql for $name {
            $crate::private::postgres_types::accepts!(INT2);
            $crate::private::postgres_types::to_sql_checked!();

            fn to_sql(
                &self,
                ty: &$crate::private::postgres_types::Type,
                w: &mut $crate::private::postgres_types::private::BytesMut,
            ) -> Result<
                $crate::private::postgres_types::IsNull,
                ::std::boxed::Box<
                    dyn ::std::error::Error
                        + ::core::marker::Sync
                        + ::core::marker::Send
                >,
            > {
                $crate::private::postgres_types::ToSql::to_sql(
                    &i16::from(self.u8()),
                    ty,
                    w,
                )
            }
        }
    };
}
