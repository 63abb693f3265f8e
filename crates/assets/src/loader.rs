use gazewalk_common::Transform;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::scene::{ModelInstance, SceneMutation};

/// Content-addressed asset ID computed from the asset bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl AssetId {
    /// First eight bytes of the SHA-256 of `bytes`, little endian.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self(u64::from_le_bytes(head))
    }
}

/// What a request is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Equirectangular environment map used as lighting and background.
    Environment,
    /// Scene graph (glTF / GLB).
    Model,
}

/// A load request: where to fetch from and how to place the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRequest {
    pub url: String,
    pub kind: AssetKind,
    /// Placement for models; ignored for environments.
    #[serde(default)]
    pub placement: Transform,
}

impl AssetRequest {
    pub fn environment(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: AssetKind::Environment,
            placement: Transform::default(),
        }
    }

    pub fn model(url: impl Into<String>, placement: Transform) -> Self {
        Self {
            url: url.into(),
            kind: AssetKind::Model,
            placement,
        }
    }
}

/// Environment map metadata. Pixel data stays with the external renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentMap {
    pub id: AssetId,
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// Model metadata: the mesh names declared by the scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: AssetId,
    pub source: String,
    pub meshes: Vec<String>,
}

/// Result of a successful load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedAsset {
    Environment(EnvironmentMap),
    Model(Model),
}

impl LoadedAsset {
    pub fn id(&self) -> AssetId {
        match self {
            Self::Environment(e) => e.id,
            Self::Model(m) => m.id,
        }
    }

    /// The scene change this asset produces for `request`.
    pub fn into_mutation(self, request: &AssetRequest) -> SceneMutation {
        match self {
            Self::Environment(env) => SceneMutation::SetEnvironment(env),
            Self::Model(model) => SceneMutation::AddModel(ModelInstance {
                model,
                transform: request.placement,
            }),
        }
    }
}

/// Errors from asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error loading {url}: {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported asset format: {0}")]
    UnsupportedFormat(String),
    #[error("HDR header error in {url}: {reason}")]
    HdrHeader { url: String, reason: String },
    #[error("glTF parse error in {url}: {reason}")]
    GltfParse { url: String, reason: String },
    #[error("asset loader dropped request for {0}")]
    Disconnected(String),
}

/// External loader collaborator: resolves a request into asset metadata.
///
/// Called from background threads, hence `Send + Sync`.
pub trait AssetLoader: Send + Sync {
    fn load(&self, request: &AssetRequest) -> Result<LoadedAsset, AssetError>;
}

/// Loads assets from a directory on the local file system.
///
/// Only the HDR header and the glTF document are inspected: enough to
/// validate the file and name its contents. Decoding is left to the renderer.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        std::fs::read(self.root.join(url)).map_err(|source| AssetError::Io {
            url: url.to_string(),
            source,
        })
    }
}

impl AssetLoader for FsLoader {
    fn load(&self, request: &AssetRequest) -> Result<LoadedAsset, AssetError> {
        let url = request.url.as_str();
        let extension = Path::new(url)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match (request.kind, extension.as_str()) {
            (AssetKind::Environment, "hdr") => {
                let bytes = self.read(url)?;
                let (width, height) = parse_hdr_header(url, &bytes)?;
                Ok(LoadedAsset::Environment(EnvironmentMap {
                    id: AssetId::from_bytes(&bytes),
                    source: url.to_string(),
                    width,
                    height,
                }))
            }
            (AssetKind::Model, "gltf" | "glb") => {
                let bytes = self.read(url)?;
                let gltf = gltf::Gltf::from_slice(&bytes).map_err(|e| AssetError::GltfParse {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(LoadedAsset::Model(Model {
                    id: AssetId::from_bytes(&bytes),
                    source: url.to_string(),
                    meshes: mesh_names(&gltf),
                }))
            }
            (kind, ext) => Err(AssetError::UnsupportedFormat(format!(
                "{kind:?} from .{ext} ({url})"
            ))),
        }
    }
}

/// Parse a Radiance HDR header and return `(width, height)`.
fn parse_hdr_header(url: &str, bytes: &[u8]) -> Result<(u32, u32), AssetError> {
    let err = |reason: &str| AssetError::HdrHeader {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    // The header is ASCII; pixel data after the resolution line is binary.
    let mut lines = bytes.split(|b| *b == b'\n');
    let magic = lines.next().ok_or_else(|| err("empty file"))?;
    if !(magic.starts_with(b"#?RADIANCE") || magic.starts_with(b"#?RGBE")) {
        return Err(err("missing #?RADIANCE signature"));
    }

    // Header variables run until the first blank line.
    loop {
        let line = lines.next().ok_or_else(|| err("unterminated header"))?;
        if line.iter().all(u8::is_ascii_whitespace) {
            break;
        }
    }

    let resolution = lines.next().ok_or_else(|| err("missing resolution line"))?;
    let resolution = std::str::from_utf8(resolution).map_err(|_| err("non-ASCII resolution"))?;
    let tokens: Vec<&str> = resolution.split_whitespace().collect();
    let [axis_a, a, _axis_b, b] = tokens.as_slice() else {
        return Err(err("malformed resolution line"));
    };
    let a: u32 = a.parse().map_err(|_| err("bad dimension"))?;
    let b: u32 = b.parse().map_err(|_| err("bad dimension"))?;
    match axis_a.as_bytes().get(1) {
        Some(b'Y') => Ok((b, a)),
        Some(b'X') => Ok((a, b)),
        _ => Err(err("unknown axis in resolution line")),
    }
}

/// Mesh names declared in a glTF document; unnamed meshes get `mesh_<i>`.
fn mesh_names(gltf: &gltf::Gltf) -> Vec<String> {
    gltf.meshes()
        .map(|mesh| match mesh.name() {
            Some(name) => name.to_string(),
            None => format!("mesh_{}", mesh.index()),
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    const GLB_MAGIC: u32 = 0x4654_6C67; // "glTF"
    const GLB_CHUNK_JSON: u32 = 0x4E4F_534A; // "JSON"

    /// Minimal valid document: one triangle accessor shared by `meshes`.
    fn gltf_json(meshes: &str) -> String {
        format!(
            r#"{{"asset":{{"version":"2.0"}},"buffers":[{{"byteLength":36}}],"bufferViews":[{{"buffer":0,"byteLength":36}}],"accessors":[{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,0]}}],"meshes":[{meshes}]}}"#
        )
    }

    const PRIMITIVE: &str = r#""primitives":[{"attributes":{"POSITION":0}}]"#;

    pub(crate) fn hdr_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = format!(
            "#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y {height} +X {width}\n"
        )
        .into_bytes();
        bytes.extend_from_slice(&[0x02, 0x02, 0x00, 0x10]);
        bytes
    }

    pub(crate) fn glb_bytes(json: &str) -> Vec<u8> {
        let mut chunk = json.as_bytes().to_vec();
        while chunk.len() % 4 != 0 {
            chunk.push(b' ');
        }
        let total = 12 + 8 + chunk.len();
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(chunk.len() as u32).to_le_bytes());
        out.extend_from_slice(&GLB_CHUNK_JSON.to_le_bytes());
        out.extend_from_slice(&chunk);
        out
    }

    fn write(dir: &Path, name: &str, bytes: &[u8]) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(bytes).unwrap();
    }

    #[test]
    fn loads_hdr_environment() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "env.hdr", &hdr_bytes(1024, 512));
        let loader = FsLoader::new(dir.path());

        let asset = loader.load(&AssetRequest::environment("env.hdr")).unwrap();
        let LoadedAsset::Environment(env) = asset else {
            panic!("expected environment");
        };
        assert_eq!((env.width, env.height), (1024, 512));
        assert_eq!(env.source, "env.hdr");
    }

    #[test]
    fn rejects_hdr_without_signature() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "env.hdr", b"P6\n1 1\n255\n");
        let loader = FsLoader::new(dir.path());
        let err = loader.load(&AssetRequest::environment("env.hdr")).unwrap_err();
        assert!(matches!(err, AssetError::HdrHeader { .. }));
    }

    #[test]
    fn loads_gltf_mesh_names() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "scene.gltf",
            gltf_json(&format!(r#"{{"name":"floor",{PRIMITIVE}}},{{{PRIMITIVE}}}"#)).as_bytes(),
        );
        let loader = FsLoader::new(dir.path());
        let asset = loader
            .load(&AssetRequest::model("scene.gltf", Transform::default()))
            .unwrap();
        let LoadedAsset::Model(model) = asset else {
            panic!("expected model");
        };
        assert_eq!(model.meshes, vec!["floor".to_string(), "mesh_1".to_string()]);
    }

    #[test]
    fn loads_glb_container() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "scene-optimized.glb",
            &glb_bytes(&gltf_json(&format!(r#"{{"name":"hall",{PRIMITIVE}}}"#))),
        );
        let loader = FsLoader::new(dir.path());
        let asset = loader
            .load(&AssetRequest::model("scene-optimized.glb", Transform::default()))
            .unwrap();
        assert!(matches!(asset, LoadedAsset::Model(ref m) if m.meshes == ["hall"]));
    }

    #[test]
    fn rejects_glb_with_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = glb_bytes("{}");
        bytes[0] = b'x';
        write(dir.path(), "bad.glb", &bytes);
        let loader = FsLoader::new(dir.path());
        let err = loader
            .load(&AssetRequest::model("bad.glb", Transform::default()))
            .unwrap_err();
        assert!(matches!(err, AssetError::GltfParse { .. }));
    }

    #[test]
    fn rejects_json_that_is_not_gltf() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "scene.gltf", b"[1, 2, 3]");
        write(dir.path(), "x.glb", &glb_bytes(r#"{"meshes": 5}"#));
        let loader = FsLoader::new(dir.path());
        for url in ["scene.gltf", "x.glb"] {
            let err = loader
                .load(&AssetRequest::model(url, Transform::default()))
                .unwrap_err();
            assert!(matches!(err, AssetError::GltfParse { .. }), "{url}: {err}");
        }
    }

    #[test]
    fn rejects_document_without_asset_version() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "scene.gltf", br#"{"meshes":[]}"#);
        let loader = FsLoader::new(dir.path());
        let err = loader
            .load(&AssetRequest::model("scene.gltf", Transform::default()))
            .unwrap_err();
        assert!(matches!(err, AssetError::GltfParse { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FsLoader::new(dir.path());
        let err = loader.load(&AssetRequest::environment("nope.hdr")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn unsupported_extension() {
        let loader = FsLoader::new(".");
        let err = loader
            .load(&AssetRequest::model("scene.obj", Transform::default()))
            .unwrap_err();
        assert!(matches!(err, AssetError::UnsupportedFormat(_)));
    }

    #[test]
    fn content_addressed_ids() {
        assert_eq!(AssetId::from_bytes(b"abc"), AssetId::from_bytes(b"abc"));
        assert_ne!(AssetId::from_bytes(b"abc"), AssetId::from_bytes(b"abd"));
    }
}
