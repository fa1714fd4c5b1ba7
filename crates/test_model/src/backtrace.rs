/// A captured backtrace, as a list of return addresses.
///
/// Addresses are only meaningful inside the process that captured them; a
/// consumer in another process cannot symbolicate them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backtrace {
    pub addresses: Vec<u64>,
}

impl Backtrace {
    pub fn from_addresses(addresses: Vec<u64>) -> Self {
        Self { addresses }
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
