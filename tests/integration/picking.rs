//! Ray picking against posed skeletons

use glam::{Quat, Vec3};
use posekit::picking::{BONE_RADIUS, Ray, bone_intersect, highlight_transform, pick_bone};
use posekit::{BoneDef, Skeleton};
use std::f32::consts::FRAC_PI_2;

fn upright_unit_bone() -> Skeleton {
    Skeleton::from_bones(&[BoneDef {
        position: Vec3::ZERO,
        endpoint: Vec3::Y,
        parent: None,
    }])
    .expect("valid bone")
}

#[test]
fn camera_ray_down_the_axis_enters_through_the_cap() {
    // Bone along Y at the origin, radius 0.07, length 1; ray straight down
    let skeleton = upright_unit_bone();
    let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);

    let t = bone_intersect(skeleton.bone(0).unwrap(), &ray, BONE_RADIUS)
        .expect("axial ray should enter through the near cap");
    // Near cap is the tip at y = 1, four units below the origin of the ray
    assert!((t - 4.0).abs() < 1e-4);
    assert!((ray.point_at(t).y - 1.0).abs() < 1e-4);
}

#[test]
fn perpendicular_ray_through_midpoint_has_ordered_roots() {
    let skeleton = upright_unit_bone();
    let ray = Ray::new(Vec3::new(-3.0, 0.5, 0.0), Vec3::X);
    let t = bone_intersect(skeleton.bone(0).unwrap(), &ray, BONE_RADIUS)
        .expect("perpendicular center ray must hit");
    // First root is the near side of the cylinder
    assert!((t - (3.0 - BONE_RADIUS)).abs() < 1e-4);
}

#[test]
fn nearest_of_two_overlapping_bones_wins() {
    let skeleton = Skeleton::from_bones(&[
        BoneDef {
            position: Vec3::new(0.0, 0.0, 4.0),
            endpoint: Vec3::new(0.0, 1.0, 4.0),
            parent: None,
        },
        BoneDef {
            position: Vec3::new(0.0, 0.0, 1.5),
            endpoint: Vec3::new(0.0, 1.0, 1.5),
            parent: None,
        },
    ])
    .expect("valid skeleton");

    let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::Z);
    let pick = pick_bone(&skeleton, &ray, BONE_RADIUS).expect("ray crosses both bones");
    assert_eq!(pick.bone, 1);
    assert!(pick.t < 4.0 - BONE_RADIUS);
}

#[test]
fn picking_follows_the_current_pose() {
    let mut skeleton = Skeleton::from_bones(&[
        BoneDef {
            position: Vec3::ZERO,
            endpoint: Vec3::Y,
            parent: None,
        },
        BoneDef {
            position: Vec3::Y,
            endpoint: Vec3::new(0.0, 2.0, 0.0),
            parent: Some(0),
        },
    ])
    .expect("valid chain");

    // Bend the root so the child lies along -X at height zero
    skeleton.rotate_bone(0, Quat::from_rotation_z(FRAC_PI_2));

    // A ray over the child's new location picks it
    let ray = Ray::new(Vec3::new(-1.5, 5.0, 0.0), Vec3::NEG_Y);
    let pick = pick_bone(&skeleton, &ray, BONE_RADIUS).expect("posed child under ray");
    assert_eq!(pick.bone, 1);

    // The child's rest-pose location is now empty space
    let rest_ray = Ray::new(Vec3::new(0.3, 1.5, 0.0), Vec3::Z);
    assert!(pick_bone(&skeleton, &rest_ray, BONE_RADIUS).is_none());
}

#[test]
fn miss_clears_selection() {
    let skeleton = upright_unit_bone();
    let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::Y);
    assert!(pick_bone(&skeleton, &ray, BONE_RADIUS).is_none());
}

#[test]
fn highlight_cylinder_covers_the_picked_bone() {
    let mut skeleton = upright_unit_bone();
    skeleton.rotate_bone(0, Quat::from_rotation_x(0.9));
    let bone = skeleton.bone(0).unwrap();

    let display = highlight_transform(bone, BONE_RADIUS).expect("non-degenerate bone");
    // Unit cylinder along +Y maps onto the segment
    let mapped_tip = display.rotation * Vec3::new(0.0, display.scale.y, 0.0) + display.translation;
    assert!((mapped_tip - bone.endpoint).length() < 1e-4);
}
