pub struct Department {
    pub name: &'static str,
    pub description: &'static str,
    pub symptoms: &'static [&'static str],
}

pub static DEPARTMENTS: &[Department] = &[
    Department {
        name: "Cardiology",
        description: "Heart and cardiovascular system",
        symptoms: &[
            "chest pain",
            "heart palpitations",
            "high blood pressure",
            "irregular heartbeat",
            "shortness of breath with chest discomfort",
            "swollen legs",
            "dizziness with chest pain",
        ],
    },
    Department {
        name: "Neurology",
        description: "Brain, spinal cord, and nervous system",
        symptoms: &[
            "headache",
            "migraine",
            "dizziness",
            "vertigo",
            "numbness",
            "tingling",
            "memory loss",
            "tremors",
            "balance problems",
            "blurred vision",
            "speech difficulty",
        ],
    },
    Department {
        name: "Orthopedics",
        description: "Bones, joints, and musculoskeletal system",
        symptoms: &[
            "joint pain",
            "bone pain",
            "back pain",
            "fracture",
            "sprain",
            "muscle pain",
            "stiffness",
            "swollen joints",
            "difficulty walking",
            "knee pain",
            "shoulder pain",
        ],
    },
    Department {
        name: "Gastroenterology",
        description: "Digestive system and gastrointestinal tract",
        symptoms: &[
            "stomach pain",
            "abdominal pain",
            "nausea",
            "vomiting",
            "diarrhea",
            "constipation",
            "bloating",
            "acid reflux",
            "heartburn",
            "loss of appetite",
            "blood in stool",
        ],
    },
    Department {
        name: "Pulmonology",
        description: "Lungs and respiratory system",
        symptoms: &[
            "cough",
            "persistent cough",
            "wheezing",
            "shortness of breath",
            "breathing difficulty",
            "asthma",
            "chest congestion",
            "mucus production",
        ],
    },
    Department {
        name: "Dermatology",
        description: "Skin, hair, and nail conditions",
        symptoms: &[
            "skin rash",
            "itching",
            "acne",
            "eczema",
            "psoriasis",
            "skin lesion",
            "hives",
            "skin discoloration",
            "mole changes",
            "hair loss",
        ],
    },
    Department {
        name: "ENT (Ear, Nose & Throat)",
        description: "Ear, nose, throat, and related structures",
        symptoms: &[
            "ear pain",
            "hearing loss",
            "ringing in ears",
            "sore throat",
            "sinus pain",
            "nasal congestion",
            "nosebleed",
            "difficulty swallowing",
            "hoarse voice",
            "tonsillitis",
        ],
    },
    Department {
        name: "Ophthalmology",
        description: "Eyes and vision",
        symptoms: &[
            "eye pain",
            "blurred vision",
            "double vision",
            "red eyes",
            "eye discharge",
            "vision loss",
            "floaters",
            "light sensitivity",
        ],
    },
    Department {
        name: "Pediatrics",
        description: "Medical care for infants, children, and adolescents",
        symptoms: &[
            "child fever",
            "child rash",
            "child cough",
            "child vomiting",
            "child diarrhea",
            "child not eating",
            "child crying",
            "child ear infection",
        ],
    },
    Department {
        name: "Psychiatry",
        description: "Mental health and behavioral conditions",
        symptoms: &[
            "anxiety",
            "depression",
            "insomnia",
            "panic attacks",
            "mood swings",
            "stress",
            "hallucinations",
            "paranoia",
            "obsessive thoughts",
            "eating disorder",
        ],
    },
    Department {
        name: "General Medicine",
        description: "General health concerns and primary care",
        symptoms: &[
            "fever",
            "fatigue",
            "weakness",
            "weight loss",
            "weight gain",
            "body aches",
            "chills",
            "sweating",
            "general discomfort",
            "cold",
            "flu",
            "infection",
        ],
    },
    Department {
        name: "Urology",
        description: "Urinary tract and male reproductive system",
        symptoms: &[
            "painful urination",
            "frequent urination",
            "blood in urine",
            "kidney pain",
            "urinary incontinence",
        ],
    },
    Department {
        name: "Gynecology",
        description: "Female reproductive system",
        symptoms: &[
            "menstrual irregularity",
            "pelvic pain",
            "vaginal discharge",
            "pregnancy concerns",
            "menstrual cramps",
        ],
    },
    Department {
        name: "Emergency Medicine",
        description: "Life-threatening and critical conditions",
        symptoms: &[
            "severe pain",
            "high fever unresponsive to medication",
            "sudden collapse",
            "severe trauma",
        ],
    },
];

pub fn department_prompt_info() -> String {
    DEPARTMENTS
        .iter()
        .map(|d| {
            let examples = d.symptoms.iter().take(5).copied().collect::<Vec<_>>().join(", ");
            format!("- {}: {} (e.g. {examples})", d.name, d.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
