/// Argon2 cost parameters
///
/// Every hash embeds the parameters it was made with, so raising the cost
/// does not invalidate existing hashes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PasswordHashing {
    /// Memory cost in KiB
    pub mem_cost: u32,
    /// Number of passes
    pub time_cost: u32,
    /// Degree of parallelism
    pub lanes: u32,
}

impl Default for PasswordHashing {
    fn default() -> PasswordHashing {
        PasswordHashing {
            mem_cost: 19456,
            time_cost: 2,
            lanes: 1,
        }
    }
}
