//! The structural model both scenes render.

use glam::Vec3;
use timeleap_engine::mesh::{primitives, Material, Mesh};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PartKind {
    Platform,
    Column,
    Roof,
    Finial,
}

/// One rigid piece of a structure with its pristine finish.
#[derive(Debug, Clone, PartialEq)]
pub struct StructurePart {
    pub kind: PartKind,
    pub mesh: Mesh,
    pub finish: Material,
}

/// Something a scene can render.
///
/// Parts are produced once at mount; their order is stable, so a part's
/// index doubles as the slot its uploaded mesh lives in.
pub trait StructureModel {
    fn name(&self) -> &str;

    fn parts(&self) -> Vec<StructurePart>;
}

/// Stepped platform, four columns, a slab carrying a dome, and a finial.
#[derive(Debug, Clone, PartialEq)]
pub struct Pavilion {
    pub platform_half: f32,
    pub platform_height: f32,
    pub column_radius: f32,
    pub column_height: f32,
    /// Distance of each column from the centre along x and z.
    pub column_offset: f32,
    pub dome_radius: f32,
    pub segments: u32,
}

impl Default for Pavilion {
    fn default() -> Self {
        Self {
            platform_half: 2.2,
            platform_height: 0.5,
            column_radius: 0.22,
            column_height: 2.4,
            column_offset: 1.5,
            dome_radius: 1.5,
            segments: 24,
        }
    }
}

impl Pavilion {
    fn sandstone() -> Material {
        Material::new(Vec3::new(0.78, 0.62, 0.45), 0.6, 0.0)
    }

    fn pale_stone() -> Material {
        Material::new(Vec3::new(0.86, 0.80, 0.70), 0.45, 0.0)
    }

    fn dome_plaster() -> Material {
        Material::new(Vec3::new(0.92, 0.86, 0.74), 0.35, 0.05)
    }

    fn gilt() -> Material {
        Material::new(Vec3::new(0.95, 0.76, 0.32), 0.22, 0.9)
    }
}

impl StructureModel for Pavilion {
    fn name(&self) -> &str {
        "pavilion"
    }

    fn parts(&self) -> Vec<StructurePart> {
        let seg = self.segments.max(6);
        let h = self.platform_height;

        // Two-tier base.
        let mut platform = primitives::cuboid(
            Vec3::new(0.0, h * 0.25, 0.0),
            Vec3::new(self.platform_half + 0.3, h * 0.25, self.platform_half + 0.3),
        );
        platform.append(&primitives::cuboid(
            Vec3::new(0.0, h * 0.75, 0.0),
            Vec3::new(self.platform_half, h * 0.25, self.platform_half),
        ));

        let mut parts = vec![StructurePart {
            kind: PartKind::Platform,
            mesh: platform,
            finish: Self::sandstone(),
        }];

        let o = self.column_offset;
        for (x, z) in [(-o, -o), (o, -o), (o, o), (-o, o)] {
            parts.push(StructurePart {
                kind: PartKind::Column,
                mesh: primitives::cylinder(Vec3::new(x, h, z), self.column_radius, self.column_height, seg),
                finish: Self::pale_stone(),
            });
        }

        let slab_y = h + self.column_height;
        let slab_half = o + self.column_radius + 0.25;
        let mut roof = primitives::cuboid(
            Vec3::new(0.0, slab_y + 0.15, 0.0),
            Vec3::new(slab_half, 0.15, slab_half),
        );
        roof.append(&primitives::dome(
            Vec3::new(0.0, slab_y + 0.3, 0.0),
            self.dome_radius,
            seg / 2,
            seg,
        ));
        parts.push(StructurePart {
            kind: PartKind::Roof,
            mesh: roof,
            finish: Self::dome_plaster(),
        });

        let crown = slab_y + 0.3 + self.dome_radius;
        let mut finial = primitives::cylinder(Vec3::new(0.0, crown - 0.05, 0.0), 0.06, 0.25, 8);
        finial.append(&primitives::sphere(Vec3::new(0.0, crown + 0.3, 0.0), 0.12, 6, 12));
        finial.append(&primitives::cone(Vec3::new(0.0, crown + 0.4, 0.0), 0.08, 0.45, 12));
        parts.push(StructurePart {
            kind: PartKind::Finial,
            mesh: finial,
            finish: Self::gilt(),
        });

        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pavilion_has_the_expected_parts() {
        let parts = Pavilion::default().parts();
        let count = |k| parts.iter().filter(|p| p.kind == k).count();
        assert_eq!(count(PartKind::Platform), 1);
        assert_eq!(count(PartKind::Column), 4);
        assert_eq!(count(PartKind::Roof), 1);
        assert_eq!(count(PartKind::Finial), 1);
        assert!(parts.iter().all(|p| !p.mesh.is_empty()));
    }

    #[test]
    fn parts_stack_bottom_to_top() {
        let parts = Pavilion::default().parts();
        let top = |k: PartKind| {
            parts
                .iter()
                .filter(|p| p.kind == k)
                .filter_map(|p| p.mesh.bounds())
                .map(|(_, hi)| hi.y)
                .fold(f32::MIN, f32::max)
        };
        assert!(top(PartKind::Platform) < top(PartKind::Column));
        assert!(top(PartKind::Column) < top(PartKind::Roof));
        assert!(top(PartKind::Roof) < top(PartKind::Finial));
    }

    #[test]
    fn columns_sit_on_the_platform() {
        let p = Pavilion::default();
        for part in p.parts().iter().filter(|p| p.kind == PartKind::Column) {
            let (lo, _) = part.mesh.bounds().unwrap();
            assert!((lo.y - p.platform_height).abs() < 1e-5);
        }
    }

    #[test]
    fn order_is_stable() {
        let a: Vec<PartKind> = Pavilion::default().parts().iter().map(|p| p.kind).collect();
        let b: Vec<PartKind> = Pavilion::default().parts().iter().map(|p| p.kind).collect();
        assert_eq!(a, b);
        assert_eq!(a.first(), Some(&PartKind::Platform));
        assert_eq!(a.last(), Some(&PartKind::Finial));
    }
}
