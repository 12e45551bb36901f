//! Policy model: request, policy and grouping shapes, effect and matcher.

mod definition;

pub use definition::{
    parse_policy_line, parse_policy_text, Effect, ModelDefinition, Request, MODEL_CONF,
    RBAC_WITH_PATHS,
};
