//! The scene catalogue.
//!
//! Each builder returns the objects and render options of one named scene;
//! the caller wraps the objects in a BVH root and renders.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::ValueEnum;

use cinder_core::{import_obj, load_image};
use cinder_math::Vec3;
use cinder_render::{
    cuboid, model_to_hittables, rng, CheckerTexture, Color, ConstantMedium, Dielectric,
    DiffuseLight, Hittable, ImageTexture, Lambertian, Material, Metal, NoiseTexture, Quad,
    RenderOptions, RotateY, Sphere, Translate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneName {
    BouncingSpheres,
    CheckeredSpheres,
    Earth,
    PerlinSpheres,
    Quads,
    SimpleLight,
    CornellBox,
    CornellSmoke,
    Model,
}

pub struct SceneDescription {
    pub world: Vec<Arc<dyn Hittable>>,
    pub options: RenderOptions,
    pub width: u32,
    pub height: u32,
}

/// Build the named scene, loading assets from `input` where one is needed.
pub fn build(name: SceneName, input: Option<&Path>) -> anyhow::Result<SceneDescription> {
    match name {
        SceneName::BouncingSpheres => Ok(bouncing_spheres()),
        SceneName::CheckeredSpheres => Ok(checkered_spheres()),
        SceneName::Earth => earth(input),
        SceneName::PerlinSpheres => Ok(perlin_spheres()),
        SceneName::Quads => Ok(quads()),
        SceneName::SimpleLight => Ok(simple_light()),
        SceneName::CornellBox => Ok(cornell_box()),
        SceneName::CornellSmoke => Ok(cornell_smoke()),
        SceneName::Model => model(input),
    }
}

/// Daylight background for the outdoor scenes.
fn sky() -> Color {
    Color::new(0.7, 0.8, 1.0)
}

fn bouncing_spheres() -> SceneDescription {
    let mut world: Vec<Arc<dyn Hittable>> = Vec::new();

    let checker = Arc::new(CheckerTexture::from_colors(
        0.6,
        Color::new(0.2, 0.4, 0.1),
        Color::new(0.1, 0.2, 0.5),
    ));
    world.push(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::textured(checker)),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_material = rng::random_f32();
            let center = Vec3::new(
                a as f32 + 0.9 * rng::random_f32(),
                0.2,
                b as f32 + 0.9 * rng::random_f32(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_material < 0.8 {
                let albedo = rng::random_color() * rng::random_color();
                let center2 = center + Vec3::new(0.0, rng::random_range(0.0, 0.5), 0.0);
                world.push(Arc::new(Sphere::new_moving(
                    center,
                    center2,
                    0.2,
                    Arc::new(Lambertian::new(albedo)),
                )));
            } else if choose_material < 0.95 {
                let albedo = rng::random_color_range(0.5, 1.0);
                let fuzz = rng::random_range(0.0, 0.5);
                world.push(Arc::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Metal::new(albedo, fuzz)),
                )));
            } else {
                world.push(Arc::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Dielectric::new(1.5)),
                )));
            }
        }
    }

    world.push(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.push(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.push(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    SceneDescription {
        world,
        options: RenderOptions {
            fov: 20f32.to_radians(),
            num_samples: 30,
            max_depth: 10,
            look_from: Vec3::new(13.0, 2.0, 3.0),
            look_at: Vec3::ZERO,
            focus_distance: 10.0,
            defocus_angle: 0.6f32.to_radians(),
            background: sky(),
        },
        width: 800,
        height: 500,
    }
}

fn checkered_spheres() -> SceneDescription {
    let checker: Arc<CheckerTexture> = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    let material: Arc<dyn Material> = Arc::new(Lambertian::textured(checker));

    let world: Vec<Arc<dyn Hittable>> = vec![
        Arc::new(Sphere::new(
            Vec3::new(0.0, -10.0, 0.0),
            10.0,
            material.clone(),
        )),
        Arc::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, material)),
    ];

    SceneDescription {
        world,
        options: RenderOptions {
            fov: 20f32.to_radians(),
            num_samples: 50,
            max_depth: 8,
            look_from: Vec3::new(13.0, 2.0, 3.0),
            look_at: Vec3::ZERO,
            focus_distance: 10.0,
            defocus_angle: 0.0,
            background: sky(),
        },
        width: 700,
        height: 450,
    }
}

fn earth(input: Option<&Path>) -> anyhow::Result<SceneDescription> {
    let path = input.unwrap_or_else(|| Path::new("assets/textures/earthmap.jpg"));
    let image = load_image(path).with_context(|| format!("no earth texture at {}", path.display()))?;

    let texture = Arc::new(ImageTexture::new(Arc::new(image)));
    let world: Vec<Arc<dyn Hittable>> = vec![Arc::new(Sphere::new(
        Vec3::ZERO,
        2.0,
        Arc::new(Lambertian::textured(texture)),
    ))];

    Ok(SceneDescription {
        world,
        options: RenderOptions {
            fov: 20f32.to_radians(),
            num_samples: 100,
            max_depth: 8,
            look_from: Vec3::new(0.0, 0.0, 12.0),
            look_at: Vec3::ZERO,
            focus_distance: 10.0,
            defocus_angle: 0.0,
            background: sky(),
        },
        width: 1000,
        height: 600,
    })
}

fn perlin_spheres() -> SceneDescription {
    let noise = Arc::new(NoiseTexture::new(2.0));
    let material: Arc<dyn Material> = Arc::new(Lambertian::textured(noise));

    let world: Vec<Arc<dyn Hittable>> = vec![
        Arc::new(Sphere::new(
            Vec3::new(0.0, -1000.0, 0.0),
            1000.0,
            material.clone(),
        )),
        Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, material)),
    ];

    SceneDescription {
        world,
        options: RenderOptions {
            fov: 20f32.to_radians(),
            num_samples: 25,
            max_depth: 8,
            look_from: Vec3::new(13.0, 2.0, 3.0),
            look_at: Vec3::ZERO,
            focus_distance: 10.0,
            defocus_angle: 0.0,
            background: sky(),
        },
        width: 1280,
        height: 720,
    }
}

fn quads() -> SceneDescription {
    let world: Vec<Arc<dyn Hittable>> = vec![
        // back
        Arc::new(Quad::new(
            Vec3::new(-2.0, -2.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            Arc::new(Lambertian::new(Color::new(1.0, 0.2, 0.2))),
        )),
        // left
        Arc::new(Quad::new(
            Vec3::new(-2.0, -2.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
            Vec3::new(0.0, 4.0, 0.0),
            Arc::new(Lambertian::new(Color::new(0.2, 0.2, 1.0))),
        )),
        // right
        Arc::new(Quad::new(
            Vec3::new(2.0, -2.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
            Arc::new(Lambertian::new(Color::new(0.2, 1.0, 0.2))),
        )),
        // bottom
        Arc::new(Quad::new(
            Vec3::new(-2.0, -2.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
            Arc::new(Lambertian::new(Color::new(1.0, 1.0, 1.0))),
        )),
        // top
        Arc::new(Quad::new(
            Vec3::new(-2.0, 2.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 4.0),
            Arc::new(Lambertian::new(Color::new(0.5, 0.0, 0.5))),
        )),
    ];

    SceneDescription {
        world,
        options: RenderOptions {
            fov: 80f32.to_radians(),
            num_samples: 50,
            max_depth: 20,
            look_from: Vec3::new(0.0, 0.0, 9.0),
            look_at: Vec3::ZERO,
            focus_distance: 10.0,
            defocus_angle: 0.0,
            background: sky(),
        },
        width: 500,
        height: 500,
    }
}

fn simple_light() -> SceneDescription {
    let mut world: Vec<Arc<dyn Hittable>> = Vec::new();

    let noise = Arc::new(NoiseTexture::new(2.0));
    world.push(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::textured(noise)),
    )));
    world.push(Arc::new(Sphere::new(
        Vec3::new(0.0, 2.0, 0.0),
        2.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.2)),
    )));

    let checker = Arc::new(CheckerTexture::from_colors(
        1.0,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.push(Arc::new(Sphere::new(
        Vec3::new(-3.0, 2.0, 3.0),
        2.0,
        Arc::new(Lambertian::textured(checker)),
    )));

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(4.0)));
    world.push(Arc::new(Sphere::new(
        Vec3::new(0.0, 7.0, 0.0),
        2.0,
        light.clone(),
    )));
    world.push(Arc::new(Quad::new(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        light,
    )));

    SceneDescription {
        world,
        options: RenderOptions {
            fov: 20f32.to_radians(),
            num_samples: 5000,
            max_depth: 10,
            look_from: Vec3::new(20.0, 6.0, 13.0),
            look_at: Vec3::new(0.0, 2.0, 0.0),
            focus_distance: 10.0,
            defocus_angle: 0.0,
            background: Color::splat(0.001),
        },
        width: 800,
        height: 400,
    }
}

/// The five Cornell walls shared by the box and smoke scenes.
fn cornell_walls(world: &mut Vec<Arc<dyn Hittable>>) {
    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));

    // left (green) and right (red) walls
    world.push(Arc::new(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.push(Arc::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    // floor, ceiling, back
    world.push(Arc::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    world.push(Arc::new(Quad::new(
        Vec3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    )));
    world.push(Arc::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white,
    )));
}

fn cornell_options() -> RenderOptions {
    RenderOptions {
        fov: 40f32.to_radians(),
        num_samples: 5000,
        max_depth: 15,
        look_from: Vec3::new(278.0, 278.0, -800.0),
        look_at: Vec3::new(278.0, 278.0, 0.0),
        focus_distance: 10.0,
        defocus_angle: 0.0,
        background: Color::ZERO,
    }
}

fn cornell_box() -> SceneDescription {
    let mut world: Vec<Arc<dyn Hittable>> = Vec::new();
    cornell_walls(&mut world);

    world.push(Arc::new(Quad::new(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        Arc::new(DiffuseLight::new(Color::splat(15.0))),
    )));

    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    for side in cuboid(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone()) {
        let rotated = Arc::new(RotateY::new(side, 15f32.to_radians()));
        world.push(Arc::new(Translate::new(
            rotated,
            Vec3::new(265.0, 0.0, 295.0),
        )));
    }
    for side in cuboid(Vec3::ZERO, Vec3::new(165.0, 165.0, 165.0), white) {
        let rotated = Arc::new(RotateY::new(side, (-18f32).to_radians()));
        world.push(Arc::new(Translate::new(
            rotated,
            Vec3::new(130.0, 0.0, 65.0),
        )));
    }

    SceneDescription {
        world,
        options: cornell_options(),
        width: 1000,
        height: 1000,
    }
}

fn cornell_smoke() -> SceneDescription {
    let mut world: Vec<Arc<dyn Hittable>> = Vec::new();
    cornell_walls(&mut world);

    // Wider, dimmer ceiling light than the reference box.
    world.push(Arc::new(Quad::new(
        Vec3::new(113.0, 554.0, 127.0),
        Vec3::new(330.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 305.0),
        Arc::new(DiffuseLight::new(Color::splat(7.0))),
    )));

    world.push(Arc::new(Sphere::new(
        Vec3::new(190.0, 90.0, 190.0),
        90.0,
        Arc::new(Dielectric::new(1.5)),
    )));

    // Black smoke filling a glassy white sphere: the boundary is added to
    // the scene and reused as the medium's extent.
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.push(boundary.clone());
    world.push(Arc::new(ConstantMedium::from_color(
        boundary,
        0.01,
        Color::ZERO,
    )));

    let mut options = cornell_options();
    options.num_samples = 200;
    options.max_depth = 10;

    SceneDescription {
        world,
        options,
        width: 600,
        height: 600,
    }
}

fn model(input: Option<&Path>) -> anyhow::Result<SceneDescription> {
    let path = input.ok_or_else(|| anyhow!("the model scene needs --input <model.obj>"))?;
    let imported = import_obj(path, 1.0)?;

    let mut world = model_to_hittables(&imported);
    world.push(Arc::new(Quad::new(
        Vec3::new(-5.0, 0.0, -5.0),
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 10.0),
        Arc::new(Lambertian::new(Color::splat(0.6))),
    )));

    Ok(SceneDescription {
        world,
        options: RenderOptions {
            fov: 30f32.to_radians(),
            num_samples: 100,
            max_depth: 8,
            look_from: Vec3::new(0.0, 0.7, 2.2),
            look_at: Vec3::new(0.0, 0.4, 0.0),
            focus_distance: 2.2,
            defocus_angle: 0.0,
            background: sky(),
        },
        width: 800,
        height: 600,
    })
}
