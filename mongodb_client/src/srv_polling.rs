use std::collections::BTreeSet;

use crate::{AddressParseError, ServerAddress};

/// The set of addresses a DNS SRV lookup resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvPollingEvent {
    addresses: BTreeSet<ServerAddress>,
}

impl SrvPollingEvent {
    pub fn new(addresses: impl IntoIterator<Item = ServerAddress>) -> Self {
        Self {
            addresses: addresses.into_iter().collect(),
        }
    }

    /// Builds the event from raw SRV record targets, which are fully qualified and may carry a
    /// trailing dot.
    pub fn from_records<T>(records: &[(T, u16)]) -> Result<Self, AddressParseError>
    where
        T: AsRef<str>,
    {
        let addresses = records
            .iter()
            .map(|(target, port)| {
                let host = target.as_ref().trim_end_matches('.');
                if host.is_empty() {
                    return Err(AddressParseError::Empty);
                }
                Ok(ServerAddress::new(host, *port))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Self { addresses })
    }

    pub fn addresses(&self) -> &BTreeSet<ServerAddress> {
        &self.addresses
    }
}
