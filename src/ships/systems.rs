//! Ship subsystems and their damage tracking
//!
//! Each ship carries a tracker per named system. Three hits disable a
//! system; the disabled flag never reverts for the rest of the combat.

use serde::{Deserialize, Serialize};

/// Number of hits that disables a system
pub const SYSTEM_DISABLE_HITS: u8 = 3;

/// Named ship subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemName {
    MDrive,
    JDrive,
    PowerPlant,
    Sensors,
    Computer,
    Fuel,
    Bridge,
    Cargo,
    Turret,
}

impl SystemName {
    /// Systems every hull tracks by default
    pub const DEFAULT_TRACKED: [SystemName; 6] = [
        SystemName::MDrive,
        SystemName::JDrive,
        SystemName::PowerPlant,
        SystemName::Sensors,
        SystemName::Computer,
        SystemName::Fuel,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SystemName::MDrive => "Manoeuvre Drive",
            SystemName::JDrive => "Jump Drive",
            SystemName::PowerPlant => "Power Plant",
            SystemName::Sensors => "Sensors",
            SystemName::Computer => "Computer",
            SystemName::Fuel => "Fuel",
            SystemName::Bridge => "Bridge",
            SystemName::Cargo => "Cargo",
            SystemName::Turret => "Turret",
        }
    }
}

/// Accumulated damage state of one system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemStatus {
    pub hits: u8,
    pub disabled: bool,
}

impl SystemStatus {
    /// Register one hit; returns true if this hit disabled the system
    pub fn take_hit(&mut self) -> bool {
        self.hits = self.hits.saturating_add(1);
        if !self.disabled && self.hits >= SYSTEM_DISABLE_HITS {
            self.disabled = true;
            return true;
        }
        false
    }

    /// Undo one hit's worth of damage; disabled systems stay disabled
    pub fn repair_hit(&mut self) {
        if !self.disabled {
            self.hits = self.hits.saturating_sub(1);
        }
    }
}
