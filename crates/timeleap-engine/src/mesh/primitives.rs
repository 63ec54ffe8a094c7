//! Closed solids used to assemble structures.
//!
//! All builders take the solid's base or centre in model space and produce
//! outward-facing normals. Curved solids are faceted with `segments` slices
//! around +Y.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec3;

use super::Mesh;

/// Box centred on `center` with half-extents `half`. Flat-shaded.
pub fn cuboid(center: Vec3, half: Vec3) -> Mesh {
    // (normal, u axis, v axis) per face.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut mesh = Mesh::new();
    for (n, u, v) in FACES {
        let c = center + n * half;
        let du = u * half;
        let dv = v * half;
        let a = mesh.push_vertex(c - du - dv, n);
        let b = mesh.push_vertex(c + du - dv, n);
        let cc = mesh.push_vertex(c + du + dv, n);
        let d = mesh.push_vertex(c - du + dv, n);
        mesh.push_quad(a, b, cc, d);
    }
    mesh
}

/// Upright cylinder standing on `base`, with caps.
pub fn cylinder(base: Vec3, radius: f32, height: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let mut mesh = Mesh::new();
    let top = base + Vec3::Y * height;

    // Side: duplicated seam column so normals stay smooth.
    let mut ring = Vec::with_capacity(segments as usize + 1);
    for i in 0..=segments {
        let dir = radial(i, segments);
        let lo = mesh.push_vertex(base + dir * radius, dir);
        let hi = mesh.push_vertex(top + dir * radius, dir);
        ring.push((lo, hi));
    }
    for w in ring.windows(2) {
        let (a_lo, a_hi) = w[0];
        let (b_lo, b_hi) = w[1];
        mesh.push_quad(a_lo, b_lo, b_hi, a_hi);
    }

    cap(&mut mesh, top, radius, segments, Vec3::Y);
    cap(&mut mesh, base, radius, segments, Vec3::NEG_Y);
    mesh
}

/// Upright cone standing on `base`, with a base cap.
pub fn cone(base: Vec3, radius: f32, height: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let mut mesh = Mesh::new();
    let apex = base + Vec3::Y * height;
    let slope = radius / height.max(f32::EPSILON);

    for i in 0..segments {
        let d0 = radial(i, segments);
        let d1 = radial(i + 1, segments);
        let n0 = (d0 + Vec3::Y * slope).normalize_or_zero();
        let n1 = (d1 + Vec3::Y * slope).normalize_or_zero();
        let nm = (n0 + n1).normalize_or_zero();
        let a = mesh.push_vertex(base + d0 * radius, n0);
        let b = mesh.push_vertex(base + d1 * radius, n1);
        let c = mesh.push_vertex(apex, nm);
        mesh.push_triangle(a, b, c);
    }

    cap(&mut mesh, base, radius, segments, Vec3::NEG_Y);
    mesh
}

/// Upper hemisphere on `center`, with a floor disk.
pub fn dome(center: Vec3, radius: f32, rings: u32, segments: u32) -> Mesh {
    let mut mesh = spherical(center, radius, rings.max(2), segments.max(3), 0.0);
    cap(&mut mesh, center, radius, segments.max(3), Vec3::NEG_Y);
    mesh
}

/// Full sphere around `center`.
pub fn sphere(center: Vec3, radius: f32, rings: u32, segments: u32) -> Mesh {
    spherical(center, radius, rings.max(2), segments.max(3), -FRAC_PI_2)
}

/// Latitude/longitude sphere from `min_lat` up to the north pole.
fn spherical(center: Vec3, radius: f32, rings: u32, segments: u32, min_lat: f32) -> Mesh {
    let mut mesh = Mesh::new();
    let cols = segments + 1;

    for r in 0..=rings {
        let lat = min_lat + (FRAC_PI_2 - min_lat) * (r as f32 / rings as f32);
        let (sin_lat, cos_lat) = lat.sin_cos();
        for s in 0..=segments {
            let n = radial(s, segments) * cos_lat + Vec3::Y * sin_lat;
            mesh.push_vertex(center + n * radius, n);
        }
    }

    for r in 0..rings {
        for s in 0..segments {
            let a = r * cols + s;
            let b = a + 1;
            let c = b + cols;
            let d = a + cols;
            mesh.push_quad(a, b, c, d);
        }
    }
    mesh
}

/// Flat disk facing `normal` (±Y).
fn cap(mesh: &mut Mesh, center: Vec3, radius: f32, segments: u32, normal: Vec3) {
    let hub = mesh.push_vertex(center, normal);
    let first = mesh.vertices.len() as u32;
    for i in 0..segments {
        mesh.push_vertex(center + radial(i, segments) * radius, normal);
    }
    for i in 0..segments {
        let a = first + i;
        let b = first + (i + 1) % segments;
        if normal.y >= 0.0 {
            mesh.push_triangle(hub, b, a);
        } else {
            mesh.push_triangle(hub, a, b);
        }
    }
}

#[inline]
fn radial(i: u32, segments: u32) -> Vec3 {
    let t = TAU * (i as f32 / segments as f32);
    Vec3::new(t.cos(), 0.0, t.sin())
}
