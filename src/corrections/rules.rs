use super::{Checkpoint, CorrectionRule, Effect, Predicate};

const FORCE_STOP: &str = "***FORCE STOP***";

pub static BUILTIN_RULES: &[CorrectionRule] = &[
    // ── post_lines ──
    CorrectionRule {
        name: "enumeration-parens-2020-09-10",
        priority: 10,
        checkpoint: Checkpoint::PostLines,
        predicate: Predicate::DocumentId("voting_minutes_2020-09-10"),
        effects: &[Effect::RenumberParenthesized],
    },
    CorrectionRule {
        name: "hearing-year-2021-02-04",
        priority: 10,
        checkpoint: Checkpoint::PostLines,
        predicate: Predicate::DocumentId("voting_minutes_2021-02-04"),
        effects: &[Effect::Replace {
            from: "Transactional Hearing: Wednesday, February 3, 202",
            to: "Transactional Hearing: Wednesday, February 3, 2021",
        }],
    },
    CorrectionRule {
        name: "enumeration-period-2021-09-30",
        priority: 10,
        checkpoint: Checkpoint::PostLines,
        predicate: Predicate::DocumentId("voting_minutes_2021-09-30"),
        effects: &[Effect::ReplaceLines {
            table: &[
                ("1", "1."),
                ("2", "2."),
                ("3", "3."),
                ("4", "4."),
                ("5", "5."),
                ("6", "6."),
                ("7", "7."),
                ("8", "8."),
                ("9", "9."),
                ("10", "10."),
                ("11", "11."),
                ("12", "12."),
                ("13", "13."),
                ("14", "14."),
                ("15", "15."),
                ("16", "16."),
                ("17 HSI MCA BOS FB, LLC", "17. HSI MCA BOS FB, LLC"),
                ("18", "18."),
                ("19 LSFW, LLC", "19. LSFW, LLC"),
                ("20", "20."),
                ("21", "21."),
                ("22", "22."),
                ("23 MITSOS, LLC", "23. MITSOS, LLC"),
                ("24 Mattapan Gas Station Inc.", "24. Mattapan Gas Station Inc."),
                ("25 New S.S. Group, Inc", "25. New S.S. Group, Inc"),
                ("26", "26."),
                ("27", "27."),
                ("28 DW Cafe Corporation", "28. DW Cafe Corporation"),
            ],
        }],
    },
    CorrectionRule {
        name: "force-stop-2022-09-29",
        priority: 10,
        checkpoint: Checkpoint::PostLines,
        predicate: Predicate::DocumentId("voting_minutes_2022-09-29"),
        effects: &[Effect::InsertBefore {
            anchor: "Licensed Premise Informational Hearing",
            marker: FORCE_STOP,
        }],
    },
    CorrectionRule {
        name: "force-stop-2024-03-07",
        priority: 10,
        checkpoint: Checkpoint::PostLines,
        predicate: Predicate::DocumentId("voting_minutes_2024-03-07"),
        effects: &[Effect::InsertBefore {
            anchor: "Licensed Premise Inspection Hearing on",
            marker: FORCE_STOP,
        }],
    },
    // The deferral policy statement is not a license action.
    CorrectionRule {
        name: "policy-statement-2025-05-01",
        priority: 10,
        checkpoint: Checkpoint::PostLines,
        predicate: Predicate::DocumentId("voting_minutes_2025-05-01"),
        effects: &[
            Effect::RemoveLines {
                phrases: &[
                    "THE BOARD WILL DEFER DELIBERATION ON ALL NEW ALCOHOLIC BEVERAGES",
                    "LICENSE APPLICATIONS UNTIL ALL APPLICATIONS RECEIVED BY MAY 23 HAVE",
                    "BEEN HEARD",
                ],
            },
            Effect::CollapseBlankLines { max: 1 },
            Effect::InsertBefore {
                anchor: "Informational Hearing on Thursday, May 1, 2025",
                marker: FORCE_STOP,
            },
        ],
    },
    CorrectionRule {
        name: "old-new-business-ref-2025-06-26",
        priority: 10,
        checkpoint: Checkpoint::PostLines,
        predicate: Predicate::DocumentId("voting_minutes_2025-06-26"),
        effects: &[Effect::RemoveLines {
            phrases: &["See Old and New Business"],
        }],
    },
    // ── post_section ──
    CorrectionRule {
        name: "quoted-name-2020-09-17",
        priority: 10,
        checkpoint: Checkpoint::PostSection,
        predicate: Predicate::DocumentId("voting_minutes_2020-09-17"),
        effects: &[Effect::Replace {
            from: "\"ARIZONA B.B.Q. & HOUSE OF PIZZA\"",
            to: "ARIZONA B.B.Q. & HOUSE OF PIZZA",
        }],
    },
    CorrectionRule {
        name: "dba-break-2021-10-07",
        priority: 10,
        checkpoint: Checkpoint::PostSection,
        predicate: Predicate::DocumentId("voting_minutes_2021-10-07"),
        effects: &[Effect::Replace {
            from: "Doing business as: Jokr, 45 Franklin St., Boston, MA 02110",
            to: "Doing business as: Jokr\n45 Franklin St., Boston, MA 02110",
        }],
    },
    CorrectionRule {
        name: "dba-break-2022-06-30",
        priority: 10,
        checkpoint: Checkpoint::PostSection,
        predicate: Predicate::DocumentId("voting_minutes_2022-06-30"),
        effects: &[Effect::Replace {
            from: "Doing business as: McCormick & Schmicks Seafood Restaurant 300 Faneuil Hall Marketplace",
            to: "Doing business as: McCormick & Schmicks Seafood Restaurant\n300 Faneuil Hall Marketplace",
        }],
    },
    CorrectionRule {
        name: "dba-break-2022-11-17",
        priority: 10,
        checkpoint: Checkpoint::PostSection,
        predicate: Predicate::DocumentId("voting_minutes_2022-11-17"),
        effects: &[Effect::Replace {
            from: "Doing business as: Del Friscos Double Eagle Steakhouse 888 Boylston St., Boston, MA 02199",
            to: "Doing business as: Del Friscos Double Eagle Steakhouse\n888 Boylston St., Boston, MA 02199",
        }],
    },
    CorrectionRule {
        name: "dba-label-2023-08-17",
        priority: 10,
        checkpoint: Checkpoint::PostSection,
        predicate: Predicate::DocumentId("voting_minutes_2023-08-17"),
        effects: &[Effect::Replace {
            from: "Doing business: The Capital Burger",
            to: "Doing business as: The Capital Burger",
        }],
    },
    CorrectionRule {
        name: "license-break-2023-12-14",
        priority: 10,
        checkpoint: Checkpoint::PostSection,
        predicate: Predicate::DocumentId("voting_minutes_2023-12-14"),
        effects: &[Effect::Replace {
            from: "211 Hanover St, Boston, MA 02113 License #: LB-99356",
            to: "211 Hanover St, Boston, MA 02113\nLicense #: LB-99356",
        }],
    },
    CorrectionRule {
        name: "enumeration-period-2024-09-26",
        priority: 10,
        checkpoint: Checkpoint::PostSection,
        predicate: Predicate::DocumentId("voting_minutes_2024-09-26"),
        effects: &[Effect::Replace {
            from: "23 Locale, Inc.",
            to: "23. Locale, Inc.",
        }],
    },
    CorrectionRule {
        name: "neighborhood-easton-boston",
        priority: 20,
        checkpoint: Checkpoint::PostSection,
        predicate: Predicate::Contains("Easton Boston"),
        effects: &[Effect::Replace {
            from: "Easton Boston",
            to: "East Boston",
        }],
    },
];
