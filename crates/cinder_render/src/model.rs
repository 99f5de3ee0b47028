//! Glue from imported models to scene primitives.

use std::sync::Arc;

use cinder_core::{ObjMaterial, ObjModel};

use crate::hittable::Hittable;
use crate::material::{Dielectric, Lambertian, Material};
use crate::texture::ImageTexture;
use crate::triangle::Triangle;

/// Index of refraction used for imported transparent materials.
const GLASS_IOR: f32 = 1.5;

/// Convert an imported model into triangles.
///
/// Each mesh shares one material across all of its faces: a Lambertian
/// over the mesh's diffuse map, or glass for transparent materials.
pub fn model_to_hittables(model: &ObjModel) -> Vec<Arc<dyn Hittable>> {
    let mut hittables: Vec<Arc<dyn Hittable>> = Vec::with_capacity(model.triangle_count());

    for mesh in &model.meshes {
        let material: Arc<dyn Material> = match &mesh.material {
            ObjMaterial::DiffuseMap(image) => Arc::new(Lambertian::textured(Arc::new(
                ImageTexture::new(image.clone()),
            ))),
            ObjMaterial::Glass => Arc::new(Dielectric::new(GLASS_IOR)),
        };

        for face in &mesh.faces {
            let [a, b, c] = face.vertices;
            hittables.push(Arc::new(Triangle::new(
                a.position,
                b.position,
                c.position,
                [a.normal, b.normal, c.normal],
                [a.uv, b.uv, c.uv],
                material.clone(),
            )));
        }
    }

    hittables
}
