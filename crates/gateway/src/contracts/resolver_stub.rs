//! L1 resolver stub contract bindings.
//!
//! The stub is the contract clients talk to on L1. Its `addr` reverts to the
//! gateway; `addrWithProof` re-verifies what the gateway returns.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, sol};

use crate::{GatewayError, rpc::L1Client};

sol! {
    /// Resolver stub interface as deployed on L1.
    interface IResolverStub {
        /// Header of a state commitment batch, in `Lib_OVMCodec` field order.
        struct ChainBatchHeader {
            uint256 batchIndex;
            bytes32 batchRoot;
            uint256 batchSize;
            uint256 prevTotalElements;
            bytes extraData;
        }

        /// Merkle inclusion proof of a state root within its batch.
        struct ChainInclusionProof {
            uint256 index;
            bytes32[] siblings;
        }

        /// Everything `addrWithProof` needs to re-derive an L2 storage value.
        struct L2StateProof {
            bytes32 stateRoot;
            ChainBatchHeader stateRootBatchHeader;
            ChainInclusionProof stateRootProof;
            bytes stateTrieWitness;
            bytes storageTrieWitness;
        }

        /// URL of the gateway serving this stub.
        function gateway() external view returns (string memory);

        /// Address of the resolver contract on L2.
        function l2resolver() external view returns (address);

        /// Resolves `node`; answered off-chain by the gateway.
        function addr(bytes32 node) external view returns (address);

        /// Verifies `proof` and returns the address record of `node`.
        function addrWithProof(bytes32 node, L2StateProof proof) external view returns (address);
    }
}

/// Reads `l2resolver()` from the stub deployed at `stub`.
pub async fn read_l2_resolver(l1: &dyn L1Client, stub: Address) -> Result<Address, GatewayError> {
    let calldata = Bytes::from(IResolverStub::l2resolverCall {}.abi_encode());
    let output = l1.call_contract(stub, calldata, None).await?;

    IResolverStub::l2resolverCall::abi_decode_returns(&output).map_err(|e| {
        GatewayError::Contract(format!("l2resolver() on {stub} returned invalid data: {e}"))
    })
}
