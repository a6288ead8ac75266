use crate::config::Config;
use crate::constants::{FCR_ACL_SUFFIX, FCR_METADATA_SUFFIX};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use ocfl::{ExternalHandling, InteractionModel, ResourceHeaders};
use rdf::{namespaces, Model};

/// Fields common to every kind of resource header (§4.4).
struct CommonFields {
    created_by: String,
    created_date: DateTime<Utc>,
    last_modified_by: String,
    last_modified_date: DateTime<Utc>,
    state_token: String,
}

fn common_fields(model: &Model, config: &Config, resource_id: &str) -> Result<CommonFields> {
    let last_modified_date = model
        .date_value(namespaces::FEDORA_LAST_MODIFIED)
        .ok_or_else(|| {
            Error::MissingField("fedora:lastModified".to_string(), resource_id.to_string())
        })?;
    // "If created is absent in the RDF, created := lastModified."
    let created_date = model
        .date_value(namespaces::FEDORA_CREATED)
        .unwrap_or(last_modified_date);
    let created_by = model
        .first_value(namespaces::FEDORA_CREATED_BY)
        .unwrap_or_else(|| config.fedora_user.clone());
    let last_modified_by = model
        .first_value(namespaces::FEDORA_LAST_MODIFIED_BY)
        .unwrap_or_else(|| config.fedora_user.clone());
    let state_token = ResourceHeaders::compute_state_token(last_modified_date);
    Ok(CommonFields {
        created_by,
        created_date,
        last_modified_by,
        last_modified_date,
        state_token,
    })
}

/// The last-modified instant for `model`, without building full headers.
/// Used to compare a live resource's RDF against its most recent memento (§4.3 Step 3).
pub fn last_modified(model: &Model, resource_id: &str) -> Result<DateTime<Utc>> {
    model
        .date_value(namespaces::FEDORA_LAST_MODIFIED)
        .ok_or_else(|| {
            Error::MissingField("fedora:lastModified".to_string(), resource_id.to_string())
        })
}

fn container_interaction_model(model: &Model) -> InteractionModel {
    let types = model.types();
    for candidate in namespaces::LDP_CONTAINER_TYPES.iter() {
        if types.iter().any(|found| found == candidate) {
            if *candidate == namespaces::LDP_DIRECT_CONTAINER {
                return InteractionModel::DirectContainer;
            }
            if *candidate == namespaces::LDP_INDIRECT_CONTAINER {
                return InteractionModel::IndirectContainer;
            }
            return InteractionModel::BasicContainer;
        }
    }
    InteractionModel::RdfSource
}

pub fn container_headers(
    model: &Model,
    config: &Config,
    id: &str,
    parent_id: Option<String>,
) -> Result<ResourceHeaders> {
    let common = common_fields(model, config, id)?;
    Ok(ResourceHeaders {
        id: id.to_string(),
        parent_id,
        interaction_model: container_interaction_model(model),
        object_root: true,
        archival_group: false,
        deleted: false,
        created_by: common.created_by,
        created_date: common.created_date,
        last_modified_by: common.last_modified_by,
        last_modified_date: common.last_modified_date,
        state_token: common.state_token,
        content_size: None,
        digests: Vec::new(),
        filename: None,
        mime_type: None,
        external_url: None,
        external_handling: None,
    })
}

pub fn binary_content_headers(
    model: &Model,
    config: &Config,
    id: &str,
    parent_id: Option<String>,
) -> Result<ResourceHeaders> {
    let common = common_fields(model, config, id)?;
    let content_size = model
        .first_value(namespaces::PREMIS_HAS_SIZE)
        .ok_or_else(|| Error::MissingField("premis:hasSize".to_string(), id.to_string()))
        .and_then(|value| {
            value
                .parse::<i64>()
                .map_err(|_| Error::MissingField("premis:hasSize".to_string(), id.to_string()))
        })?;
    Ok(ResourceHeaders {
        id: id.to_string(),
        parent_id,
        interaction_model: InteractionModel::NonRdfSource,
        object_root: true,
        archival_group: false,
        deleted: false,
        created_by: common.created_by,
        created_date: common.created_date,
        last_modified_by: common.last_modified_by,
        last_modified_date: common.last_modified_date,
        state_token: common.state_token,
        content_size: Some(content_size),
        digests: model.uris(namespaces::PREMIS_HAS_MESSAGE_DIGEST),
        filename: model.first_value(namespaces::EBUCORE_FILENAME),
        mime_type: model.first_value(namespaces::EBUCORE_HAS_MIME_TYPE),
        external_url: None,
        external_handling: None,
    })
}

pub fn binary_description_headers(
    model: &Model,
    config: &Config,
    parent_id: &str,
) -> Result<ResourceHeaders> {
    let id = format!("{}/{}", parent_id, FCR_METADATA_SUFFIX);
    let common = common_fields(model, config, &id)?;
    Ok(ResourceHeaders {
        id,
        parent_id: Some(parent_id.to_string()),
        interaction_model: InteractionModel::NonRdfSourceDescription,
        object_root: false,
        archival_group: false,
        deleted: false,
        created_by: common.created_by,
        created_date: common.created_date,
        last_modified_by: common.last_modified_by,
        last_modified_date: common.last_modified_date,
        state_token: common.state_token,
        content_size: None,
        digests: Vec::new(),
        filename: None,
        mime_type: None,
        external_url: None,
        external_handling: None,
    })
}

pub fn acl_headers(model: &Model, config: &Config, parent_id: &str) -> Result<ResourceHeaders> {
    let id = format!("{}/{}", parent_id, FCR_ACL_SUFFIX);
    let common = common_fields(model, config, &id)?;
    Ok(ResourceHeaders {
        id,
        parent_id: Some(parent_id.to_string()),
        interaction_model: InteractionModel::Acl,
        object_root: false,
        archival_group: false,
        deleted: false,
        created_by: common.created_by,
        created_date: common.created_date,
        last_modified_by: common.last_modified_by,
        last_modified_date: common.last_modified_date,
        state_token: common.state_token,
        content_size: None,
        digests: Vec::new(),
        filename: None,
        mime_type: None,
        external_url: None,
        external_handling: None,
    })
}

pub fn external_binary_headers(
    model: &Model,
    config: &Config,
    id: &str,
    parent_id: Option<String>,
    external_url: String,
    handling: ExternalHandling,
) -> Result<ResourceHeaders> {
    let common = common_fields(model, config, id)?;
    Ok(ResourceHeaders {
        id: id.to_string(),
        parent_id,
        interaction_model: InteractionModel::NonRdfSource,
        object_root: true,
        archival_group: false,
        deleted: false,
        created_by: common.created_by,
        created_date: common.created_date,
        last_modified_by: common.last_modified_by,
        last_modified_date: common.last_modified_date,
        state_token: common.state_token,
        content_size: None,
        digests: Vec::new(),
        filename: None,
        mime_type: model.first_value(namespaces::EBUCORE_HAS_MIME_TYPE),
        external_url: Some(external_url),
        external_handling: Some(handling),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rdf::{parse_rdf, RdfSyntax};
    use std::io::Write;

    fn model_from(contents: &str) -> Model {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        parse_rdf(file.path(), RdfSyntax::Turtle).unwrap()
    }

    fn config() -> Config {
        crate::config::ConfigBuilder {
            source_version: Some("5.1".into()),
            target_version: Some("6.0".into()),
            input_dir: Some(std::env::temp_dir()),
            output_dir: Some(std::env::temp_dir()),
            base_uri: Some("http://example.org/rest".into()),
            ..Default::default()
        }
        .build()
        .unwrap()
    }

    #[test]
    fn container_without_known_type_falls_back_to_rdf_source() {
        let model = model_from(
            r#"
            @prefix fedora: <http://fedora.info/definitions/v4/repository#> .
            <http://example.org/rest/x> fedora:lastModified "2020-10-15T05:39:47Z"^^<http://www.w3.org/2001/XMLSchema#dateTime> .
            "#,
        );
        let headers = container_headers(&model, &config(), "info:fedora/x", None).unwrap();
        assert_eq!(headers.interaction_model, InteractionModel::RdfSource);
    }

    #[test]
    fn binary_content_requires_premis_has_size() {
        let model = model_from(
            r#"
            @prefix fedora: <http://fedora.info/definitions/v4/repository#> .
            <http://example.org/rest/x> fedora:lastModified "2020-10-15T05:39:47Z"^^<http://www.w3.org/2001/XMLSchema#dateTime> .
            "#,
        );
        let result = binary_content_headers(&model, &config(), "info:fedora/x", None);
        assert!(matches!(result, Err(Error::MissingField(_, _))));
    }

    #[test]
    fn created_date_defaults_to_last_modified_when_absent() {
        let model = model_from(
            r#"
            @prefix fedora: <http://fedora.info/definitions/v4/repository#> .
            <http://example.org/rest/x> fedora:lastModified "2020-10-15T05:39:47Z"^^<http://www.w3.org/2001/XMLSchema#dateTime> .
            "#,
        );
        let headers = container_headers(&model, &config(), "info:fedora/x", None).unwrap();
        assert_eq!(headers.created_date, Utc.ymd(2020, 10, 15).and_hms(5, 39, 47));
    }
}
