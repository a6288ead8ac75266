use rdf::RdfSyntax;
use std::path::PathBuf;

static DEFAULT_FEDORA_USER: &str = "fedoraAdmin";
static DEFAULT_FEDORA_USER_ADDRESS: &str = "info:fedora/fedoraAdmin";

/// The internal URI scheme every resource identifier is translated to.
pub static INTERNAL_PREFIX: &str = "info:fedora";

/// Immutable, validated configuration for one migration run. Shared read-only
/// across every worker via `Arc<Config>` (§5 Shared State: "Configuration is
/// read-only after construction").
#[derive(Debug, Clone)]
pub struct Config {
    pub source_version: String,
    pub target_version: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub base_uri: String,
    pub src_rdf_lang: RdfSyntax,
    pub threads: usize,
    pub digest_algorithm: ocfl::DigestAlgorithm,
    pub fedora_user: String,
    pub fedora_user_address: String,
    pub force_windows_mode: bool,
}

/// A builder mirroring the recognized options; every field but the four
/// required ones may be left at its default.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    pub source_version: Option<String>,
    pub target_version: Option<String>,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub base_uri: Option<String>,
    pub src_rdf_lang: Option<String>,
    pub threads: Option<usize>,
    pub digest_algorithm: Option<String>,
    pub fedora_user: Option<String>,
    pub fedora_user_address: Option<String>,
    pub force_windows_mode: bool,
}

impl ConfigBuilder {
    pub fn build(self) -> Result<Config, String> {
        let source_version = self
            .source_version
            .ok_or_else(|| "sourceVersion is required".to_string())?;
        if !source_version.starts_with('5') {
            return Err(format!(
                "sourceVersion '{}' is not supported; this core migrates Fedora 5+",
                source_version
            ));
        }

        let target_version = self
            .target_version
            .ok_or_else(|| "targetVersion is required".to_string())?;
        if !target_version.starts_with('6') {
            return Err(format!(
                "targetVersion '{}' is not supported; this core targets Fedora 6+",
                target_version
            ));
        }

        let input_dir = self
            .input_dir
            .ok_or_else(|| "inputDir is required".to_string())?;
        if !input_dir.is_dir() {
            return Err(format!(
                "inputDir '{}' does not exist",
                input_dir.display()
            ));
        }

        let output_dir = self
            .output_dir
            .ok_or_else(|| "outputDir is required".to_string())?;

        let base_uri = self
            .base_uri
            .ok_or_else(|| "baseUri is required for Fedora 6".to_string())?;

        let src_rdf_lang = self
            .src_rdf_lang
            .map(|lang| rdf::parse_syntax(&lang))
            .unwrap_or_default();

        let threads = self.threads.unwrap_or_else(num_cpus::get);
        if threads == 0 {
            return Err("threads must be greater than zero".to_string());
        }

        let digest_algorithm = match self.digest_algorithm.as_deref() {
            None => ocfl::DigestAlgorithm::Sha512,
            Some(name) => name
                .parse()
                .map_err(|_| format!("unknown digestAlgorithm '{}'", name))?,
        };

        Ok(Config {
            source_version,
            target_version,
            input_dir,
            output_dir,
            base_uri,
            src_rdf_lang,
            threads,
            digest_algorithm,
            fedora_user: self.fedora_user.unwrap_or_else(|| DEFAULT_FEDORA_USER.to_string()),
            fedora_user_address: self
                .fedora_user_address
                .unwrap_or_else(|| DEFAULT_FEDORA_USER_ADDRESS.to_string()),
            force_windows_mode: self.force_windows_mode,
        })
    }
}

impl Config {
    /// The root of the OCFL storage tree, per §6.5: `outputDir/data/ocfl-root/`.
    pub fn ocfl_storage_root(&self) -> PathBuf {
        self.output_dir.join("data").join("ocfl-root")
    }
}
