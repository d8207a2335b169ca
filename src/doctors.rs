//! Doctor directory
//!
//! The fixed list of doctors a patient can choose from. Profiles copy the
//! chosen doctor's name and specialty at save time, so this list is only
//! consulted when a profile is built.

use serde::Serialize;

/// A doctor offered on the intake form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Doctor {
    pub id: &'static str,
    pub name: &'static str,
    pub specialty: &'static str,
}

impl Doctor {
    /// Label shown in the doctor picker
    pub fn label(&self) -> String {
        format!("{} — {}", self.name, self.specialty)
    }
}

pub static DOCTORS: [Doctor; 5] = [
    Doctor {
        id: "d1",
        name: "Dr. Alice Carter",
        specialty: "Cardiology",
    },
    Doctor {
        id: "d2",
        name: "Dr. Brian Singh",
        specialty: "Neurology",
    },
    Doctor {
        id: "d3",
        name: "Dr. Clara Gomez",
        specialty: "Pediatrics",
    },
    Doctor {
        id: "d4",
        name: "Dr. David Kim",
        specialty: "Dermatology",
    },
    Doctor {
        id: "d5",
        name: "Dr. Emma Rossi",
        specialty: "Orthopedics",
    },
];

/// Look up a doctor by id
pub fn find_doctor(id: &str) -> Option<&'static Doctor> {
    DOCTORS.iter().find(|d| d.id == id)
}
