use crate::constants::{is_reserved, rdf_extension};
use crate::error::Result;
use crate::resource::{decode_segment, ResourceDescriptor};
use rdf::RdfSyntax;
use std::fs;
use std::path::Path;

/// Enumerates `descriptor`'s direct children, descending through ghost-node
/// directories so that their concrete descendants are returned parented to
/// `descriptor` itself (§4.6).
pub fn enumerate_children(
    descriptor: &ResourceDescriptor,
    syntax: RdfSyntax,
) -> Result<Vec<ResourceDescriptor>> {
    let mut children = Vec::new();
    walk(
        &descriptor.inner_dir(),
        &descriptor.full_id,
        &descriptor.full_id,
        syntax,
        &mut children,
    )?;
    Ok(children)
}

fn walk(
    container_dir: &Path,
    id_prefix: &str,
    root_parent_id: &str,
    syntax: RdfSyntax,
    out: &mut Vec<ResourceDescriptor>,
) -> Result<()> {
    if !container_dir.is_dir() {
        return Ok(());
    }

    let ext = rdf_extension(syntax);
    let mut child_set = std::collections::HashSet::new();
    let mut ghosts = Vec::new();

    for entry in fs::read_dir(container_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_reserved(&name) {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            ghosts.push(name);
            continue;
        }
        if name.ends_with(".headers") {
            continue;
        }
        let descriptor = if let Some(stem) = name.strip_suffix(".binary") {
            Some((stem.to_string(), ResourceDescriptorKind::Binary))
        } else if let Some(stem) = name.strip_suffix(".external") {
            Some((stem.to_string(), ResourceDescriptorKind::ExternalBinary))
        } else if let Some(stem) = name.strip_suffix(&format!(".{}", ext)) {
            Some((stem.to_string(), ResourceDescriptorKind::Container))
        } else {
            None
        };

        if let Some((stem, kind)) = descriptor {
            // An empty stem (a bare `.ttl` et al.) is the container's own live
            // RDF sidecar, not a child with an empty path segment.
            if stem.is_empty() {
                continue;
            }
            child_set.insert(stem.clone());
            let full_id = format!("{}/{}", id_prefix, decode_segment(&stem));
            let descriptor = match kind {
                ResourceDescriptorKind::Binary => ResourceDescriptor::binary(
                    Some(root_parent_id.to_string()),
                    full_id,
                    container_dir.to_path_buf(),
                    stem,
                ),
                ResourceDescriptorKind::ExternalBinary => ResourceDescriptor::external_binary(
                    Some(root_parent_id.to_string()),
                    full_id,
                    container_dir.to_path_buf(),
                    stem,
                ),
                ResourceDescriptorKind::Container => ResourceDescriptor::container(
                    Some(root_parent_id.to_string()),
                    full_id,
                    container_dir.to_path_buf(),
                    stem,
                ),
            };
            out.push(descriptor);
        }
    }

    for ghost in ghosts {
        if child_set.contains(&ghost) {
            continue;
        }
        let ghost_dir = container_dir.join(&ghost);
        let nested_prefix = format!("{}/{}", id_prefix, decode_segment(&ghost));
        walk(&ghost_dir, &nested_prefix, root_parent_id, syntax, out)?;
    }

    Ok(())
}

enum ResourceDescriptorKind {
    Binary,
    ExternalBinary,
    Container,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn touch(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = File::create(path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn finds_concrete_children_of_every_kind() {
        let dir = tempfile::tempdir().unwrap();
        let root = ResourceDescriptor::container(
            None,
            "info:fedora/parent".into(),
            dir.path().to_path_buf(),
            String::new(),
        );
        touch(&dir.path().join("binary-child.binary"), "payload");
        touch(&dir.path().join("container-child.ttl"), "");

        let children = enumerate_children(&root, RdfSyntax::Turtle).unwrap();
        let ids: Vec<_> = children.iter().map(|c| c.full_id.clone()).collect();
        assert!(ids.contains(&"info:fedora/parent/binary-child".to_string()));
        assert!(ids.contains(&"info:fedora/parent/container-child".to_string()));
    }

    #[test]
    fn ghost_directories_are_flattened_to_the_nearest_concrete_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let root = ResourceDescriptor::container(
            None,
            "info:fedora/parent".into(),
            dir.path().to_path_buf(),
            String::new(),
        );
        touch(&dir.path().join("a/b/c/hidden-container.ttl"), "");
        touch(&dir.path().join("a/b/ghost-binary.binary"), "payload");

        let children = enumerate_children(&root, RdfSyntax::Turtle).unwrap();
        assert_eq!(children.len(), 2);
        for child in &children {
            assert_eq!(child.parent_id.as_deref(), Some("info:fedora/parent"));
        }
        let ids: Vec<_> = children.iter().map(|c| c.full_id.clone()).collect();
        assert!(ids.contains(&"info:fedora/parent/a/b/c/hidden-container".to_string()));
        assert!(ids.contains(&"info:fedora/parent/a/b/ghost-binary".to_string()));
    }
}
