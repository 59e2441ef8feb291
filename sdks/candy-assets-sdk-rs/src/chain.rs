//! Chain-side metadata lookups

use async_trait::async_trait;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_request::RpcError,
};
use tracing::debug;

use crate::{error::FetchError, pda, state::MetadataAccount, TokenId};

/// Resolves a token's current on-chain metadata pointer.
#[async_trait]
pub trait ChainMetadataClient: Send + Sync {
    async fn metadata_uri(&self, token: &TokenId) -> Result<String, FetchError>;
}

/// Reads Token Metadata accounts over JSON-RPC.
pub struct SolanaRpcClient {
    rpc: RpcClient,
}

impl SolanaRpcClient {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self::with_client(RpcClient::new(rpc_url.into()))
    }

    pub fn with_client(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    pub fn rpc_url(&self) -> String {
        self.rpc.url()
    }

    /// Fetch and decode the metadata account for `token`.
    pub async fn read_metadata_account(
        &self,
        token: &TokenId,
    ) -> Result<MetadataAccount, FetchError> {
        let mint = pda::parse_mint(token.as_str())?;
        let (address, _bump) = pda::find_metadata_pda(&mint);
        debug!("metadata account for {token}: {address}");

        let data = self
            .rpc
            .get_account_data(&address)
            .await
            .map_err(|e| rpc_error(token, e))?;
        decode_metadata_account(&data)
    }
}

#[async_trait]
impl ChainMetadataClient for SolanaRpcClient {
    async fn metadata_uri(&self, token: &TokenId) -> Result<String, FetchError> {
        let account = self.read_metadata_account(token).await?;
        Ok(account.data.uri)
    }
}

/// Decode raw account data into a metadata account.
pub fn decode_metadata_account(data: &[u8]) -> Result<MetadataAccount, FetchError> {
    MetadataAccount::unpack(data).map_err(FetchError::InvalidAccount)
}

/// Sort a client failure into the fetch error taxonomy.
fn rpc_error(token: &TokenId, err: ClientError) -> FetchError {
    let mapped = match err.kind() {
        ClientErrorKind::RpcError(RpcError::ForUser(msg)) if msg.starts_with("AccountNotFound") => {
            Some(FetchError::AccountNotFound(token.to_string()))
        }
        ClientErrorKind::RpcError(RpcError::RpcResponseError { code, message, .. }) => {
            Some(FetchError::RpcResponse(format!("{message} (code {code})")))
        }
        _ => None,
    };
    mapped.unwrap_or_else(|| FetchError::Rpc(Box::new(err)))
}
