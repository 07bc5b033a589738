//! Typed ABI binding for the subset of EIP-3009/ERC-20 this facilitator calls.

alloy_sol_types::sol! {
    #[sol(rpc)]
    interface IEip3009Token {
        function balanceOf(address owner) external view returns (uint256);
        function authorizationState(address authorizer, bytes32 nonce) external view returns (bool);
        function transferWithAuthorization(
            address from,
            address to,
            uint256 value,
            uint256 validAfter,
            uint256 validBefore,
            bytes32 nonce,
            bytes signature
        ) external;
    }
}
