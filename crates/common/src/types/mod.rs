use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body returned by create endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Created {
    pub id: String,
}
