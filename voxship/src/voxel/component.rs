use super::VoxelTrait;

/// The kind of ship component a voxel holds.
///
/// `Undefined` is the empty voxel; every other kind is solid.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentType {
    #[default]
    Undefined = 0,
    Hull = 1,
    Computer = 2,
    Battery = 3,
    Drive = 4,
    Weapon = 5,
    Shield = 6,
}

impl ComponentType {
    pub const ALL: [ComponentType; 7] = [
        ComponentType::Undefined,
        ComponentType::Hull,
        ComponentType::Computer,
        ComponentType::Battery,
        ComponentType::Drive,
        ComponentType::Weapon,
        ComponentType::Shield,
    ];

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            ComponentType::Undefined => "undefined",
            ComponentType::Hull => "hull",
            ComponentType::Computer => "computer",
            ComponentType::Battery => "battery",
            ComponentType::Drive => "drive",
            ComponentType::Weapon => "weapon",
            ComponentType::Shield => "shield",
        }
    }
}

impl TryFrom<u8> for ComponentType {
    type Error = &'static str;

    #[inline]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or("Unknown component type")
    }
}

impl From<ComponentType> for u8 {
    #[inline]
    fn from(value: ComponentType) -> u8 {
        value as u8
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl VoxelTrait for ComponentType {
    #[inline(always)]
    fn is_solid(&self) -> bool {
        *self != ComponentType::Undefined
    }

    #[inline(always)]
    fn material_id(&self) -> usize {
        *self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert_eq!(ComponentType::default(), ComponentType::Undefined);
        assert!(!ComponentType::Undefined.is_solid());
        assert!(ComponentType::Hull.is_solid());
    }

    #[test]
    fn test_roundtrip_u8() {
        for component in ComponentType::ALL {
            let raw: u8 = component.into();
            assert_eq!(ComponentType::try_from(raw), Ok(component));
        }
        assert!(ComponentType::try_from(7).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ComponentType::Computer), "computer");
    }

    #[test]
    fn test_majority_over_components() {
        let children = [
            ComponentType::Hull,
            ComponentType::Hull,
            ComponentType::Undefined,
            ComponentType::Drive,
            ComponentType::Undefined,
            ComponentType::Undefined,
            ComponentType::Undefined,
            ComponentType::Undefined,
        ];
        assert_eq!(ComponentType::majority(&children), ComponentType::Hull);
    }
}
