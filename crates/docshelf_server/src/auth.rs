use docshelf_core::prelude::AuthError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

const TOKEN_WIDTH: usize = 16;
const RADIX: u128 = 32;
const DIGITS: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// Guards `POST /publish` with the single shared token stored at `token_file`.
///
/// The file is read on every check, so replacing its contents rotates the
/// token without a restart.
#[derive(Clone, Debug)]
pub struct TokenAuthenticator {
    token_file: PathBuf,
}

impl TokenAuthenticator {
    pub fn new(token_file: impl Into<PathBuf>) -> Self {
        Self {
            token_file: token_file.into(),
        }
    }

    pub fn token_file(&self) -> &Path {
        &self.token_file
    }

    /// Generates and persists a token unless one already exists.
    ///
    /// Returns `true` if a new token was written.
    pub async fn ensure_token(&self) -> Result<bool, std::io::Error> {
        if fs::try_exists(&self.token_file).await? {
            return Ok(false);
        }

        if let Some(parent) = self.token_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.token_file)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e),
        };
        file.write_all(generate_token().as_bytes()).await?;
        file.flush().await?;

        info!("Token generated, see {}", self.token_file.display());
        Ok(true)
    }

    pub async fn authenticate(&self, candidate: &str) -> Result<(), AuthError> {
        let stored = match fs::read_to_string(&self.token_file).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Cannot read token file {}: {e}", self.token_file.display());
                return Err(AuthError::InvalidToken);
            }
        };

        if !candidate.is_empty() && candidate == stored {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

/// 16 random bytes rendered as a radix-32 number, zero-padded to 16 digits.
pub fn generate_token() -> String {
    render_token(rand::random())
}

fn render_token(bytes: [u8; 16]) -> String {
    let mut value = u128::from_be_bytes(bytes);
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % RADIX) as usize]);
        value /= RADIX;
    }
    while digits.len() < TOKEN_WIDTH {
        digits.push(b'0');
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}
