use crate::config::{Config, INTERNAL_PREFIX};
use crate::constants::{
    is_reserved, rdf_extension, ACL_FILE, BINARY_EXT, HEADERS_EXT, MEMENTO_TIMESTAMP_FORMAT,
    METADATA, VERSIONS_DIR,
};
use crate::error::{Error, Result};
use crate::resource::{ResourceDescriptor, ResourceKind};
use crate::{children, synth};
use chrono::{DateTime, NaiveDateTime, Utc};
use ocfl::{ExternalHandling, ObjectSession, SessionFactory};
use rdf::{parse_rdf, write_rdf_translate_ids, Model};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Runs the central migration algorithm (§4.3) against one descriptor: reads
/// its memento history, synthesizes headers, writes versions and the live
/// state into an OCFL object session, migrates an attached ACL, and returns
/// the descriptor's direct children.
pub struct ResourceMigrator {
    config: Arc<Config>,
    factory: Arc<dyn SessionFactory>,
}

impl ResourceMigrator {
    pub fn new(config: Arc<Config>, factory: Arc<dyn SessionFactory>) -> Self {
        ResourceMigrator { config, factory }
    }

    /// Releases the session factory. Called once, by the task manager, at shutdown.
    pub fn close(&self) {
        self.factory.close();
    }

    /// Migrates one resource. On any failure the partially-written OCFL object
    /// is aborted and deleted before the error is propagated (§4.3 Atomicity).
    pub fn migrate(&self, descriptor: &ResourceDescriptor) -> Result<Vec<ResourceDescriptor>> {
        let mut session = self.factory.new_session(&descriptor.full_id)?;
        match self.migrate_with_session(descriptor, session.as_mut()) {
            Ok(children) => Ok(children),
            Err(err) => {
                let _ = session.abort();
                drop(session);
                let _ = self.factory.delete_object(&descriptor.full_id);
                Err(err)
            }
        }
    }

    fn migrate_with_session(
        &self,
        descriptor: &ResourceDescriptor,
        session: &mut dyn ObjectSession,
    ) -> Result<Vec<ResourceDescriptor>> {
        match descriptor.kind {
            ResourceKind::Container => self.migrate_container(descriptor, session),
            ResourceKind::Binary => self.migrate_binary(descriptor, session),
            ResourceKind::ExternalBinary => self.migrate_external_binary(descriptor, session),
        }
    }

    fn ext(&self) -> &'static str {
        rdf_extension(self.config.src_rdf_lang)
    }

    fn translate(&self, model: &Model) -> Result<Vec<u8>> {
        Ok(write_rdf_translate_ids(
            model,
            &self.config.base_uri,
            INTERNAL_PREFIX,
        )?)
    }

    /// §4.5: an ACL exists for a resource if `innerDir/fcr%3Aacl.<ext>` exists.
    fn read_acl(&self, descriptor: &ResourceDescriptor) -> Result<Option<Model>> {
        let path = descriptor
            .inner_dir()
            .join(format!("{}.{}", ACL_FILE, self.ext()));
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(parse_rdf(&path, self.config.src_rdf_lang)?))
    }

    /// Writes the ACL into the session's pending version, if one was found and
    /// hasn't already been written for this object (§4.5: only on the first
    /// committed version).
    fn write_acl_if_present(
        &self,
        acl: &Option<Model>,
        descriptor: &ResourceDescriptor,
        session: &mut dyn ObjectSession,
    ) -> Result<()> {
        let model = match acl {
            Some(model) => model,
            None => return Ok(()),
        };
        let headers = synth::acl_headers(model, &self.config, &descriptor.full_id)?;
        let content = self.translate(model)?;
        session.write_resource(headers, Some(content))?;
        Ok(())
    }

    fn migrate_container(
        &self,
        descriptor: &ResourceDescriptor,
        session: &mut dyn ObjectSession,
    ) -> Result<Vec<ResourceDescriptor>> {
        let ext = self.ext();
        let versions_dir = descriptor.inner_dir().join(VERSIONS_DIR);
        let timestamps = list_memento_timestamps(&versions_dir)?;
        let acl = self.read_acl(descriptor)?;
        let mut acl_written = false;
        let mut last_memento_modified = None;

        for timestamp in &timestamps {
            let memento_path = versions_dir.join(format!(
                "{}.{}",
                timestamp.format(MEMENTO_TIMESTAMP_FORMAT),
                ext
            ));
            let model = parse_rdf(&memento_path, self.config.src_rdf_lang)?;
            let headers = synth::container_headers(
                &model,
                &self.config,
                &descriptor.full_id,
                descriptor.parent_id.clone(),
            )?;
            last_memento_modified = Some(headers.last_modified_date);

            session.set_version_timestamp(*timestamp);
            let content = self.translate(&model)?;
            session.write_resource(headers, Some(content))?;
            if !acl_written {
                self.write_acl_if_present(&acl, descriptor, session)?;
                acl_written = true;
            }
            session.commit()?;
        }

        // Step 3: live state, written only when it diverges from the last memento.
        let live_path = descriptor
            .outer_dir
            .join(format!("{}.{}", descriptor.name_encoded, ext));
        let live_model = parse_rdf(&live_path, self.config.src_rdf_lang)?;
        let current_update = synth::last_modified(&live_model, &descriptor.full_id)?;
        if last_memento_modified != Some(current_update) {
            let headers = synth::container_headers(
                &live_model,
                &self.config,
                &descriptor.full_id,
                descriptor.parent_id.clone(),
            )?;
            session.set_version_timestamp(current_update);
            let content = self.translate(&live_model)?;
            session.write_resource(headers, Some(content))?;
            if !acl_written {
                self.write_acl_if_present(&acl, descriptor, session)?;
            }
            session.commit()?;
        }

        children::enumerate_children(descriptor, self.config.src_rdf_lang)
    }

    fn migrate_binary(
        &self,
        descriptor: &ResourceDescriptor,
        session: &mut dyn ObjectSession,
    ) -> Result<Vec<ResourceDescriptor>> {
        let ext = self.ext();
        let inner = descriptor.inner_dir();
        let versions_dir = inner.join(VERSIONS_DIR);
        let timestamps = list_memento_timestamps(&versions_dir)?;
        let acl = self.read_acl(descriptor)?;
        let mut acl_written = false;
        let mut last_memento_modified = None;

        for timestamp in &timestamps {
            let stamp = timestamp.format(MEMENTO_TIMESTAMP_FORMAT).to_string();
            let description_path = inner.join(METADATA).join(VERSIONS_DIR).join(format!(
                "{}.{}",
                stamp, ext
            ));
            let payload_path = versions_dir.join(format!("{}.{}", stamp, BINARY_EXT));

            let model = parse_rdf(&description_path, self.config.src_rdf_lang)?;
            let content_headers = synth::binary_content_headers(
                &model,
                &self.config,
                &descriptor.full_id,
                descriptor.parent_id.clone(),
            )?;
            let description_headers =
                synth::binary_description_headers(&model, &self.config, &descriptor.full_id)?;
            last_memento_modified = Some(content_headers.last_modified_date);

            let payload = fs::read(&payload_path)?;
            let description_content = self.translate(&model)?;

            session.set_version_timestamp(*timestamp);
            session.write_resource(content_headers, Some(payload))?;
            session.write_resource(description_headers, Some(description_content))?;
            if !acl_written {
                self.write_acl_if_present(&acl, descriptor, session)?;
                acl_written = true;
            }
            session.commit()?;
        }

        let live_description_path = inner.join(format!("{}.{}", METADATA, ext));
        let live_model = parse_rdf(&live_description_path, self.config.src_rdf_lang)?;
        let current_update = synth::last_modified(&live_model, &descriptor.full_id)?;
        if last_memento_modified != Some(current_update) {
            let content_headers = synth::binary_content_headers(
                &live_model,
                &self.config,
                &descriptor.full_id,
                descriptor.parent_id.clone(),
            )?;
            let description_headers = synth::binary_description_headers(
                &live_model,
                &self.config,
                &descriptor.full_id,
            )?;
            let live_payload_path = descriptor
                .outer_dir
                .join(format!("{}.{}", descriptor.name_encoded, BINARY_EXT));
            let payload = fs::read(&live_payload_path)?;
            let description_content = self.translate(&live_model)?;

            session.set_version_timestamp(current_update);
            session.write_resource(content_headers, Some(payload))?;
            session.write_resource(description_headers, Some(description_content))?;
            if !acl_written {
                self.write_acl_if_present(&acl, descriptor, session)?;
            }
            session.commit()?;
        }

        // Binaries are leaves; they never have children of their own.
        Ok(Vec::new())
    }

    fn migrate_external_binary(
        &self,
        descriptor: &ResourceDescriptor,
        session: &mut dyn ObjectSession,
    ) -> Result<Vec<ResourceDescriptor>> {
        // The sidecar carries RDF under a `.external` suffix rather than the
        // configured RDF extension; parsed with the configured syntax regardless.
        let sidecar_path = descriptor.outer_dir.join(format!(
            "{}.{}",
            descriptor.name_encoded,
            crate::constants::EXTERNAL_EXT
        ));
        let model = parse_rdf(&sidecar_path, self.config.src_rdf_lang)?;
        let last_modified = synth::last_modified(&model, &descriptor.full_id)?;

        let headers_path = descriptor.outer_dir.join(format!(
            "{}.{}.{}",
            descriptor.name_encoded,
            crate::constants::EXTERNAL_EXT,
            HEADERS_EXT
        ));
        let (external_url, handling) = read_external_reference(&headers_path, &descriptor.full_id)?;

        let headers = synth::external_binary_headers(
            &model,
            &self.config,
            &descriptor.full_id,
            descriptor.parent_id.clone(),
            external_url,
            handling,
        )?;

        let acl = self.read_acl(descriptor)?;
        session.set_version_timestamp(last_modified);
        session.write_resource(headers, None)?;
        self.write_acl_if_present(&acl, descriptor, session)?;
        session.commit()?;

        // External binaries are leaves; they never have children of their own.
        Ok(Vec::new())
    }
}

/// §4.3 Step 1: enumerate regular files under `versions_dir` that aren't
/// `.headers` sidecars, strip their extension, and parse the basename as a
/// `yyyyMMddHHmmss` UTC instant. Returns them sorted ascending.
fn list_memento_timestamps(versions_dir: &Path) -> Result<Vec<DateTime<Utc>>> {
    if !versions_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut timestamps = Vec::new();
    for entry in fs::read_dir(versions_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_reserved(&name) || name.ends_with(&format!(".{}", HEADERS_EXT)) {
            continue;
        }
        let stem = Path::new(&name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        let naive = NaiveDateTime::parse_from_str(&stem, MEMENTO_TIMESTAMP_FORMAT)
            .map_err(|_| Error::SourceCorrupt(format!("invalid memento timestamp '{}'", name)))?;
        timestamps.push(DateTime::<Utc>::from_utc(naive, Utc));
    }
    timestamps.sort();
    Ok(timestamps)
}

/// §4.3 Step 4 / §6.4: the sidecar headers JSON for an external binary, a map
/// of header name to a list of values. `Location` selects `redirect` handling;
/// its absence falls back to `proxy` using `Content-Location`.
fn read_external_reference(
    headers_path: &Path,
    resource_id: &str,
) -> Result<(String, ExternalHandling)> {
    let bytes = fs::read(headers_path)?;
    let headers: HashMap<String, Vec<String>> = serde_json::from_slice(&bytes)?;
    if let Some(location) = headers.get("Location").and_then(|values| values.first()) {
        return Ok((location.clone(), ExternalHandling::Redirect));
    }
    let content_location = headers
        .get("Content-Location")
        .and_then(|values| values.first())
        .ok_or_else(|| {
            Error::MissingField("Content-Location".to_string(), resource_id.to_string())
        })?;
    Ok((content_location.clone(), ExternalHandling::Proxy))
}
