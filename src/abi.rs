//! Contract bindings for the swap contract, the mock tokens and the
//! on-chain Pyth endpoint.

pub mod swap {
    alloy::sol!(
        #[derive(Debug)]
        #[sol(rpc)]
        interface OracleSwap {
            /// Balance a depositor holds in the contract's internal ledger,
            /// on the base or quote side.
            function balanceOf(bool isBase, address account) external view returns (uint256);

            /// Moves tokens from the caller into the contract ledger.
            function deposit(bool isBase, uint256 amount) external;

            /// Moves tokens from the contract ledger back to the caller.
            function withdraw(bool isBase, uint256 amount) external;

            /// Trades `size` minor units at the current oracle rate.
            /// `pythUpdateData` is posted to the Pyth contract first; the
            /// attached value must cover the update fee.
            function swap(bool isBuy, uint256 size, bytes[] calldata pythUpdateData) external payable;

            /// Accumulated incentive fees collected from buy transactions.
            function buyFee() external view returns (uint256);

            /// Accumulated incentive fees collected from sell transactions.
            function sellFee() external view returns (uint256);
        }
    );
}

pub mod erc20 {
    alloy::sol!(
        /// Mock token with an open faucet mint.
        #[derive(Debug)]
        #[sol(rpc)]
        interface ERC20 {
            function balanceOf(address account) external view returns (uint256);
            function mint(address to, uint256 amount) external;
            function decimals() external view returns (uint8);
        }
    );
}

pub mod pyth {
    alloy::sol!(
        #[derive(Debug)]
        #[sol(rpc)]
        interface IPyth {
            /// Fee required to post the given update payloads on chain.
            function getUpdateFee(bytes[] calldata updateData) external view returns (uint256 feeAmount);
        }
    );
}
