use std::{
    fs::File,
    io::{self, BufReader, Cursor},
    sync::Arc,
};

use rustls::{
    ClientConfig, RootCertStore,
    pki_types::{CertificateDer, ServerName},
};
use rustls_pemfile::certs;

use crate::config::{Config, ConfigError};

/// Builds a `RootCertStore` trusting exactly the certificates in `pem`.
///
/// # Errors
///
/// Returns an `io::Error` if the PEM is invalid or contains no certificates.
pub fn build_root_store(pem: &[u8]) -> io::Result<RootCertStore> {
    let mut cursor = Cursor::new(pem);
    let anchors: Vec<CertificateDer<'static>> = certs(&mut cursor)
        .collect::<Result<_, _>>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid CA PEM: {e}")))?;
    into_store(anchors)
}

/// Loads the trust anchor file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if the file cannot be opened or holds no valid
/// certificate.
pub fn load_trust_anchor(path: &str) -> io::Result<RootCertStore> {
    let file = File::open(path)
        .map_err(|e| io::Error::new(e.kind(), format!("opening trust anchor {path}: {e}")))?;
    let mut reader = BufReader::new(file);
    let anchors: Vec<CertificateDer<'static>> = certs(&mut reader)
        .collect::<Result<_, _>>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid certs: {e}")))?;
    into_store(anchors)
}

fn into_store(anchors: Vec<CertificateDer<'static>>) -> io::Result<RootCertStore> {
    if anchors.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "trust anchor PEM did not contain any certificates",
        ));
    }
    let mut store = RootCertStore::empty();
    for cert in anchors {
        store
            .add(cert)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("bad CA cert: {e}")))?;
    }
    Ok(store)
}

/// Client config that verifies the broker's chain against `roots` and its
/// name against the server name given at connect time.
///
/// # Errors
///
/// Fails only if the crypto provider supports none of the default protocol
/// versions.
pub fn client_config(roots: RootCertStore) -> Result<ClientConfig, rustls::Error> {
    Ok(
        ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()?
            .with_root_certificates(roots)
            .with_no_client_auth(),
    )
}

/// `[TLS]` section: `ca_file`, `server_name` and `insecure_skip_verify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    pub ca_file: String,
    pub server_name: ServerName<'static>,
}

impl TlsSettings {
    /// # Errors
    ///
    /// `ConfigError::Refused` when `insecure_skip_verify` is set: the
    /// endpoint always validates the broker certificate.
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        if cfg.get_parsed("TLS", "insecure_skip_verify", false)? {
            return Err(ConfigError::Refused(
                "insecure_skip_verify: broker certificates are always verified",
            ));
        }
        let ca_file = cfg.require("TLS", "ca_file")?.to_string();
        let raw_name = cfg.require("TLS", "server_name")?;
        let server_name =
            ServerName::try_from(raw_name.to_string()).map_err(|_| ConfigError::Invalid {
                section: "TLS".into(),
                key: "server_name".into(),
                value: raw_name.to_string(),
            })?;
        Ok(Self {
            ca_file,
            server_name,
        })
    }

    /// Loads the anchor and builds the verifying client config.
    ///
    /// # Errors
    ///
    /// `ConfigError::Io` if the anchor cannot be loaded or the config built.
    pub fn client_config(&self) -> Result<Arc<ClientConfig>, ConfigError> {
        let roots = load_trust_anchor(&self.ca_file).map_err(|e| ConfigError::Io(e.to_string()))?;
        client_config(roots)
            .map(Arc::new)
            .map_err(|e| ConfigError::Io(format!("TLS config: {e}")))
    }
}
