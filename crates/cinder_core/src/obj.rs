//! Wavefront OBJ/MTL importer.
//!
//! Produces fan-triangulated meshes with per-vertex positions, normals,
//! and texture coordinates, plus a material description per mesh. The
//! material library is deliberately narrow: a `map_Kd` diffuse map or a
//! transparency of at least 0.5 (rendered as glass); everything else in a
//! material block is ignored.
//!
//! After import the model is normalised: centered in X and Z, rested on
//! `y = 0`, and uniformly scaled so its longest axis fits `in_scale`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use cinder_math::{Vec2, Vec3};
use thiserror::Error;

use crate::image::{load_image, Image, ImageError};

/// Errors that can occur during model import.
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("material {0} is not defined in the material library")]
    UnknownMaterial(String),

    #[error("material {0} has neither a diffuse map nor transparency")]
    IncompleteMaterial(String),

    #[error("no materials defined in {0}")]
    EmptyMaterialLib(String),

    #[error("no meshes imported from {0}")]
    EmptyModel(String),
}

fn parse_error(line: usize, message: impl Into<String>) -> ObjError {
    ObjError::Parse {
        line,
        message: message.into(),
    }
}

/// One corner of an imported triangle.
#[derive(Clone, Copy, Debug)]
pub struct ObjVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// A triangle with full per-vertex attributes.
#[derive(Clone, Copy, Debug)]
pub struct ObjTriangle {
    pub vertices: [ObjVertex; 3],
}

/// Surface description attached to a mesh.
#[derive(Clone, Debug)]
pub enum ObjMaterial {
    /// Lambertian surface sampling the given image.
    DiffuseMap(Arc<Image>),
    /// Transparent surface; rendered as a dielectric downstream.
    Glass,
}

/// All faces bound to one `usemtl` material.
#[derive(Debug)]
pub struct ObjMesh {
    pub material: ObjMaterial,
    pub faces: Vec<ObjTriangle>,
}

/// An imported, normalised model.
#[derive(Debug)]
pub struct ObjModel {
    pub meshes: Vec<ObjMesh>,
}

impl ObjModel {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.faces.len()).sum()
    }
}

/// Import a wavefront model, logging any failure before returning it.
pub fn import_obj(path: impl AsRef<Path>, in_scale: f32) -> Result<ObjModel, ObjError> {
    let path = path.as_ref();
    import_obj_inner(path, in_scale).map_err(|e| {
        log::error!("failed to import {}: {}", path.display(), e);
        e
    })
}

fn import_obj_inner(path: &Path, in_scale: f32) -> Result<ObjModel, ObjError> {
    let text = std::fs::read_to_string(path)?;
    let directory = path.parent().unwrap_or_else(|| Path::new("."));

    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut texcoords: Vec<Vec2> = Vec::new();
    let mut materials: HashMap<String, ObjMaterial> = HashMap::new();
    let mut meshes: Vec<ObjMesh> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (head, rest) = split_keyword(line);
        match head {
            "mtllib" => {
                let name = rest.trim();
                if name.is_empty() {
                    return Err(parse_error(number, "mtllib without a file name"));
                }
                materials = import_mtllib(&directory.join(name))?;
            }
            "usemtl" => {
                let name = rest.trim();
                let material = materials
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ObjError::UnknownMaterial(name.to_string()))?;
                meshes.push(ObjMesh {
                    material,
                    faces: Vec::new(),
                });
            }
            "v" => positions.push(parse_vec3(rest, number)?),
            "vn" => normals.push(parse_vec3(rest, number)?),
            "vt" => texcoords.push(parse_vec2(rest, number)?),
            "f" => {
                let mesh = meshes
                    .last_mut()
                    .ok_or_else(|| parse_error(number, "usemtl must precede face elements"))?;

                let mut corners = Vec::new();
                for tuple in rest.split_whitespace() {
                    corners.push(parse_face_vertex(
                        tuple, number, &positions, &texcoords, &normals,
                    )?);
                }
                if corners.len() < 3 {
                    return Err(parse_error(number, "face with fewer than 3 vertices"));
                }

                // Fan triangulation: N vertices produce N - 2 triangles.
                for i in 1..corners.len() - 1 {
                    mesh.faces.push(ObjTriangle {
                        vertices: [corners[0], corners[i], corners[i + 1]],
                    });
                }
            }
            _ => {}
        }
    }

    if meshes.iter().all(|m| m.faces.is_empty()) {
        return Err(ObjError::EmptyModel(path.display().to_string()));
    }

    normalize(&mut meshes, in_scale);

    let model = ObjModel { meshes };
    log::info!(
        "imported {}: {} meshes, {} triangles",
        path.display(),
        model.meshes.len(),
        model.triangle_count()
    );
    Ok(model)
}

/// Parse a companion material library.
fn import_mtllib(path: &Path) -> Result<HashMap<String, ObjMaterial>, ObjError> {
    let text = std::fs::read_to_string(path)?;
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .collect();

    let mut materials = HashMap::new();
    let mut i = 0;

    while i < lines.len() {
        let (number, line) = lines[i];
        i += 1;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (head, rest) = split_keyword(line);
        if head != "newmtl" {
            continue;
        }
        let name = rest.trim();
        if name.is_empty() {
            return Err(parse_error(number, "newmtl without a material name"));
        }

        // Scan the block until something tells us what the material is.
        let mut resolved = None;
        while i < lines.len() {
            let (number, line) = lines[i];
            if line.is_empty() || line.starts_with('#') {
                i += 1;
                continue;
            }

            let (head, rest) = split_keyword(line);
            match head {
                "newmtl" => break,
                "map_Kd" => {
                    let texture = rest.trim();
                    if texture.is_empty() {
                        return Err(parse_error(number, "map_Kd without a file name"));
                    }
                    let image = load_image(directory.join(texture))?;
                    resolved = Some(ObjMaterial::DiffuseMap(Arc::new(image)));
                    i += 1;
                    break;
                }
                "Tr" | "Tf" | "d" => {
                    let value: f32 = rest
                        .split_whitespace()
                        .next()
                        .and_then(|w| w.parse().ok())
                        .ok_or_else(|| parse_error(number, "unreadable transparency value"))?;
                    // `d` stores opacity's complement directly.
                    let transparency = if head == "d" { value } else { 1.0 - value };
                    i += 1;
                    if transparency >= 0.5 {
                        resolved = Some(ObjMaterial::Glass);
                        break;
                    }
                }
                _ => i += 1,
            }
        }

        match resolved {
            Some(material) => {
                materials.insert(name.to_string(), material);
            }
            None => return Err(ObjError::IncompleteMaterial(name.to_string())),
        }
    }

    if materials.is_empty() {
        return Err(ObjError::EmptyMaterialLib(path.display().to_string()));
    }
    Ok(materials)
}

/// Center the model in X and Z, rest it on y = 0, and scale its longest
/// axis to `in_scale`.
fn normalize(meshes: &mut [ObjMesh], in_scale: f32) {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for mesh in meshes.iter() {
        for face in &mesh.faces {
            for vertex in &face.vertices {
                min = min.min(vertex.position);
                max = max.max(vertex.position);
            }
        }
    }

    let center = (min + max) / 2.0;
    let offset = Vec3::new(center.x, min.y, center.z);
    let scale = in_scale / (max - min).max_element();

    for mesh in meshes.iter_mut() {
        for face in &mut mesh.faces {
            for vertex in &mut face.vertices {
                vertex.position = (vertex.position - offset) * scale;
            }
        }
    }
}

/// Split a line into its leading keyword and the remainder.
fn split_keyword(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest),
        None => (line, ""),
    }
}

fn parse_vec3(rest: &str, line: usize) -> Result<Vec3, ObjError> {
    let mut words = rest.split_whitespace();
    let mut component = || -> Result<f32, ObjError> {
        words
            .next()
            .and_then(|w| w.parse().ok())
            .ok_or_else(|| parse_error(line, "expected three numeric components"))
    };
    Ok(Vec3::new(component()?, component()?, component()?))
}

fn parse_vec2(rest: &str, line: usize) -> Result<Vec2, ObjError> {
    let mut words = rest.split_whitespace();
    let mut component = || -> Result<f32, ObjError> {
        words
            .next()
            .and_then(|w| w.parse().ok())
            .ok_or_else(|| parse_error(line, "expected two numeric components"))
    };
    Ok(Vec2::new(component()?, component()?))
}

/// Parse one `position/texcoord/normal` tuple with 1-based indices.
fn parse_face_vertex(
    tuple: &str,
    line: usize,
    positions: &[Vec3],
    texcoords: &[Vec2],
    normals: &[Vec3],
) -> Result<ObjVertex, ObjError> {
    let mut parts = tuple.split('/');
    let mut index = |table_len: usize, what: &str| -> Result<usize, ObjError> {
        let i: usize = parts
            .next()
            .and_then(|w| w.parse().ok())
            .ok_or_else(|| parse_error(line, format!("unreadable {what} index in {tuple:?}")))?;
        if i == 0 || i > table_len {
            return Err(parse_error(line, format!("{what} index {i} out of range")));
        }
        Ok(i - 1)
    };

    let pi = index(positions.len(), "position")?;
    let ti = index(texcoords.len(), "texture coordinate")?;
    let ni = index(normals.len(), "normal")?;

    Ok(ObjVertex {
        position: positions[pi],
        normal: normals[ni],
        uv: texcoords[ti],
    })
}
