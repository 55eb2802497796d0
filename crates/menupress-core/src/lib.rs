pub mod category;
pub mod config;
pub mod products;

pub use category::{Category, UnknownCategory};
pub use config::{build_config, load_config, load_config_from_env, ConfigError, MenuConfig};
pub use products::{
    effect_label, leading_float, CbdPercent, EffectPriority, NormalizedProduct, Origin,
    RawPotency, RawProduct,
};
