use std::fmt;

/// Character classes. Each has its own mesh under `chars/british/`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PigClass {
    Ace,
    Commando,
    Grunt,
    Heavy,
    Legend,
    Medic,
    Saboteur,
    Sniper,
    Spy,
}

impl PigClass {
    /// Every class, in the order the cache builds them.
    pub const ALL: [PigClass; 9] = [
        PigClass::Ace,
        PigClass::Commando,
        PigClass::Grunt,
        PigClass::Heavy,
        PigClass::Legend,
        PigClass::Medic,
        PigClass::Saboteur,
        PigClass::Sniper,
        PigClass::Spy,
    ];

    /// File stem of the class's high detail mesh.
    pub fn file_stem(self) -> &'static str {
        match self {
            PigClass::Ace => "ac_hi",
            PigClass::Commando => "sb_hi",
            PigClass::Grunt => "gr_hi",
            PigClass::Heavy => "hv_hi",
            PigClass::Legend => "le_hi",
            PigClass::Medic => "me_hi",
            PigClass::Saboteur => "sa_hi",
            PigClass::Sniper => "sn_hi",
            PigClass::Spy => "sp_hi",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PigClass::Ace => "Ace",
            PigClass::Commando => "Commando",
            PigClass::Grunt => "Grunt",
            PigClass::Heavy => "Heavy",
            PigClass::Legend => "Legend",
            PigClass::Medic => "Medic",
            PigClass::Saboteur => "Saboteur",
            PigClass::Sniper => "Sniper",
            PigClass::Spy => "Spy",
        }
    }

    /// Look a class up by name or file stem, ignoring case.
    pub fn from_name(s: &str) -> Option<PigClass> {
        PigClass::ALL.iter().cloned().find(|class| {
            class.name().eq_ignore_ascii_case(s) || class.file_stem().eq_ignore_ascii_case(s)
        })
    }
}

impl fmt::Display for PigClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[test]
fn test_stems_are_distinct() {
    use std::collections::HashSet;
    let stems: HashSet<_> = PigClass::ALL.iter().map(|c| c.file_stem()).collect();
    assert_eq!(stems.len(), PigClass::ALL.len());
    assert_eq!(PigClass::Commando.file_stem(), "sb_hi");
    assert_eq!(PigClass::from_name("medic"), Some(PigClass::Medic));
    assert_eq!(PigClass::from_name("SN_HI"), Some(PigClass::Sniper));
    assert_eq!(PigClass::from_name("general"), None);
}
