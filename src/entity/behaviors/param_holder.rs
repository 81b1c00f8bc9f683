//! Parameter holder behavior
//!
//! A named value carrier with no tick logic. Broadcast entities resolve
//! holders at init to assemble the parameter map they fan out.

use crate::actions::value::ParamValue;

#[derive(Debug, Clone)]
pub struct ParamHolder {
    /// Parameter name contributed to a broadcast's map
    pub key: String,
    pub value: ParamValue,
}

impl ParamHolder {
    pub fn new(key: impl Into<String>, value: ParamValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}
