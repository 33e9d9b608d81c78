//! `Lib_AddressManager` contract bindings.
//!
//! Deployments register their L1 contracts by name in the address manager;
//! the gateway uses it to find the state commitment chain at startup.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, sol};

use crate::{GatewayError, rpc::L1Client};

sol! {
    /// `Lib_AddressManager` contract interface.
    interface IAddressManager {
        /// Returns the address registered under `_name`, or zero.
        function getAddress(string _name) external view returns (address);
    }
}

/// Resolves `name` through the address manager at `manager`.
///
/// A zero address means the name is not registered and is reported as an error.
pub async fn resolve_address(
    l1: &dyn L1Client,
    manager: Address,
    name: &str,
) -> Result<Address, GatewayError> {
    let calldata =
        Bytes::from(IAddressManager::getAddressCall { _name: name.to_string() }.abi_encode());
    let output = l1.call_contract(manager, calldata, None).await?;

    let address = IAddressManager::getAddressCall::abi_decode_returns(&output).map_err(|e| {
        GatewayError::Contract(format!("getAddress({name}) returned invalid data: {e}"))
    })?;

    if address == Address::ZERO {
        return Err(GatewayError::Contract(format!("{name} is not registered in {manager}")));
    }

    tracing::info!(%manager, name, %address, "Resolved contract through address manager");
    Ok(address)
}

#[cfg(test)]
mod tests {
    use alloy_sol_types::SolValue;

    use super::*;
    use crate::test_utils::MockL1;

    #[tokio::test]
    async fn test_resolve_address() {
        let chain = Address::repeat_byte(0x5c);
        let l1 = MockL1::default().with_call_output(Bytes::from(chain.abi_encode()));

        let resolved = resolve_address(&l1, Address::repeat_byte(1), "OVM_StateCommitmentChain")
            .await
            .unwrap();
        assert_eq!(resolved, chain);
    }

    #[tokio::test]
    async fn test_resolve_unregistered_name() {
        let l1 = MockL1::default().with_call_output(Bytes::from(Address::ZERO.abi_encode()));

        let err = resolve_address(&l1, Address::repeat_byte(1), "Missing").await.unwrap_err();
        assert!(matches!(err, GatewayError::Contract(msg) if msg.contains("not registered")));
    }
}
