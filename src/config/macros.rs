/// Configuration macros for zero-repetition config definitions
///
/// `config_struct!` declares a configuration section with its defaults in a
/// single place and generates:
/// - The struct with public fields
/// - The Default implementation
/// - Serde support with `#[serde(default)]`, so any subset of keys may be
///   written in the TOML file
///
/// # Example
/// ```
/// chartbot::config_struct! {
///     pub struct ChartConfig {
///         width: u32 = 900,
///         height: u32 = 500,
///     }
/// }
///
/// let cfg = ChartConfig::default();
/// assert_eq!(cfg.width, 900);
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
