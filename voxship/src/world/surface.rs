use bitflags::bitflags;
use glam::{IVec3, UVec3};

bitflags! {
  /// Visible faces of a surface voxel.
  #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
  pub struct Faces: u32 {
    const LEFT = 0b000001;
    const RIGHT = 0b000010;
    const BOTTOM = 0b000100;
    const TOP = 0b001000;
    const FRONT = 0b010000;
    const BACK = 0b100000;
  }
}

impl Faces {
    /// Each face with the direction of the neighbour it looks at.
    pub const NEIGHBOURS: [(Faces, IVec3); 6] = [
        (Faces::LEFT, IVec3::NEG_X),
        (Faces::RIGHT, IVec3::X),
        (Faces::BOTTOM, IVec3::NEG_Y),
        (Faces::TOP, IVec3::Y),
        (Faces::FRONT, IVec3::NEG_Z),
        (Faces::BACK, IVec3::Z),
    ];
}

/// One surface voxel packed into 32 bits for a point-sprite vertex buffer.
///
/// | bits  | content                                   |
/// |-------|-------------------------------------------|
/// | 0-5   | visible [`Faces`]                         |
/// | 6-8   | size exponent `s`, the voxel spans `2^s`  |
/// | 9-23  | position, 5 bits per axis, in `2^s` units |
/// | 24-31 | material                                  |
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VoxelVertex(u32);

impl VoxelVertex {
    const FACES_MASK: u32 = 0x0000_003f;
    const SIZE_SHIFT: u32 = 6;
    const SIZE_MASK: u32 = 0x0000_01c0;
    const POSITION_SHIFT: u32 = 9;
    const POSITION_MASK: u32 = 0x00ff_fe00;
    const AXIS_BITS: u32 = 5;
    const AXIS_MASK: u32 = 0x1f;
    const MATERIAL_SHIFT: u32 = 24;
    const MATERIAL_MASK: u32 = 0xff00_0000;

    pub fn new(faces: Faces, size: i32, position: IVec3, material: usize) -> Self {
        let mut vertex = Self(0);
        vertex.set_faces(faces);
        vertex.set_size(size);
        vertex.set_position(position);
        vertex.set_material(material);
        vertex
    }

    #[inline(always)]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline(always)]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub fn set_faces(&mut self, faces: Faces) {
        self.0 = (self.0 & !Self::FACES_MASK) | faces.bits();
    }

    pub fn set_size(&mut self, size: i32) {
        assert!((0..=5).contains(&size), "Voxel size {size} out of range [0, 5]");

        self.0 = (self.0 & !Self::SIZE_MASK) | ((size as u32) << Self::SIZE_SHIFT);
    }

    pub fn set_position(&mut self, position: IVec3) {
        debug_assert!(
            position.cmpge(IVec3::ZERO).all() && position.cmple(IVec3::splat(31)).all(),
            "Vertex position {position} out of range"
        );

        let p = position.as_uvec3() & UVec3::splat(Self::AXIS_MASK);
        let packed = p.x | (p.y << Self::AXIS_BITS) | (p.z << (2 * Self::AXIS_BITS));

        self.0 = (self.0 & !Self::POSITION_MASK) | (packed << Self::POSITION_SHIFT);
    }

    pub fn set_material(&mut self, material: usize) {
        debug_assert!(material < 256, "Material {material} does not fit in 8 bits");

        self.0 = (self.0 & !Self::MATERIAL_MASK) | (((material as u32) & 0xff) << Self::MATERIAL_SHIFT);
    }

    #[inline(always)]
    pub fn faces(&self) -> Faces {
        Faces::from_bits_truncate(self.0 & Self::FACES_MASK)
    }

    #[inline(always)]
    pub fn size(&self) -> i32 {
        ((self.0 & Self::SIZE_MASK) >> Self::SIZE_SHIFT) as i32
    }

    pub fn position(&self) -> IVec3 {
        let packed = (self.0 & Self::POSITION_MASK) >> Self::POSITION_SHIFT;

        IVec3::new(
            (packed & Self::AXIS_MASK) as i32,
            ((packed >> Self::AXIS_BITS) & Self::AXIS_MASK) as i32,
            ((packed >> (2 * Self::AXIS_BITS)) & Self::AXIS_MASK) as i32,
        )
    }

    #[inline(always)]
    pub fn material(&self) -> u8 {
        (self.0 >> Self::MATERIAL_SHIFT) as u8
    }

    #[inline(always)]
    pub fn is_visible(&self) -> bool {
        self.0 & Self::FACES_MASK != 0
    }
}

impl std::fmt::Debug for VoxelVertex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelVertex")
            .field("faces", &self.faces())
            .field("size", &self.size())
            .field("position", &self.position())
            .field("material", &self.material())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_do_not_overlap() {
        // Every field at its maximum; size 5 is 0b101, so bit 7 stays clear.
        let vertex = VoxelVertex::new(Faces::all(), 5, IVec3::splat(31), 255);
        assert_eq!(vertex.bits(), u32::MAX & !(0b010 << 6));
        assert_eq!(vertex.faces(), Faces::all());
        assert_eq!(vertex.size(), 5);
        assert_eq!(vertex.position(), IVec3::splat(31));
        assert_eq!(vertex.material(), 255);

        let vertex = VoxelVertex::new(Faces::TOP | Faces::BACK, 2, IVec3::new(7, 0, 19), 42);
        assert_eq!(vertex.faces(), Faces::TOP | Faces::BACK);
        assert_eq!(vertex.size(), 2);
        assert_eq!(vertex.position(), IVec3::new(7, 0, 19));
        assert_eq!(vertex.material(), 42);
    }

    #[test]
    fn test_setters_keep_other_fields() {
        let mut vertex = VoxelVertex::new(Faces::LEFT, 1, IVec3::new(1, 2, 3), 9);

        vertex.set_faces(Faces::RIGHT);
        assert_eq!(vertex.faces(), Faces::RIGHT);
        assert_eq!(vertex.position(), IVec3::new(1, 2, 3));

        vertex.set_position(IVec3::new(30, 0, 1));
        assert_eq!(vertex.size(), 1);
        assert_eq!(vertex.material(), 9);
        assert_eq!(vertex.position(), IVec3::new(30, 0, 1));
    }

    #[test]
    fn test_visibility() {
        assert!(!VoxelVertex::new(Faces::empty(), 0, IVec3::ZERO, 1).is_visible());
        assert!(VoxelVertex::new(Faces::FRONT, 0, IVec3::ZERO, 1).is_visible());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_size_out_of_range() {
        let _ = VoxelVertex::new(Faces::TOP, 6, IVec3::ZERO, 1);
    }
}
