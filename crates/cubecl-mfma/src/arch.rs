use core::fmt::Display;

/// AMD targets the layout conversion knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AMDArchitecture {
    // RDNA
    // gfx1100, gfx1101, gfx1102
    GFX11,
    // gfx1030, gfx1031, gfx1032
    GFX10,
    // CDNA
    GFX908,
    GFX90A,
    // gfx940, gfx941, gfx942
    GFX94,
    // Not particularly specific architecture
    Other,
}

impl AMDArchitecture {
    /// Parse a `gfx` target name. Unknown names map to [AMDArchitecture::Other].
    pub fn parse(arg: &str) -> Self {
        let norm = arg.trim().to_lowercase();
        if norm.starts_with("gfx11") {
            AMDArchitecture::GFX11
        } else if norm.starts_with("gfx10") {
            AMDArchitecture::GFX10
        } else if norm == "gfx908" {
            AMDArchitecture::GFX908
        } else if norm == "gfx90a" {
            AMDArchitecture::GFX90A
        } else if norm.starts_with("gfx94") {
            AMDArchitecture::GFX94
        } else {
            AMDArchitecture::Other
        }
    }

    pub fn warp_size(&self) -> u32 {
        // CDNA supports wave64 (gfx9 and gfx940+) and RDNA wave32 (gfx10, gfx11)
        match self {
            AMDArchitecture::GFX10 | AMDArchitecture::GFX11 => 32,
            AMDArchitecture::GFX908 | AMDArchitecture::GFX90A | AMDArchitecture::GFX94 => 64,
            AMDArchitecture::Other => 0,
        }
    }

    pub fn is_mfma_capable(&self) -> bool {
        matches!(
            self,
            AMDArchitecture::GFX908 | AMDArchitecture::GFX90A | AMDArchitecture::GFX94
        )
    }
}

impl Display for AMDArchitecture {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AMDArchitecture::GFX11 => f.write_str("gfx11"),
            AMDArchitecture::GFX10 => f.write_str("gfx10"),
            AMDArchitecture::GFX908 => f.write_str("gfx908"),
            AMDArchitecture::GFX90A => f.write_str("gfx90a"),
            AMDArchitecture::GFX94 => f.write_str("gfx94"),
            AMDArchitecture::Other => f.write_str("unknown"),
        }
    }
}
