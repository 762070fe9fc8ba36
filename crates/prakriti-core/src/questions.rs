//! The fixed Prakriti questionnaire.
//!
//! Twenty-five questions across skin, hair, body frame, digestion,
//! elimination, energy, sleep, climate, hydration, emotional, cognitive and
//! social traits. Option A always maps to Vata, B to Pitta, C to Kapha.

use crate::model::{Dosha, Question, QuestionOption, QuestionSet};

const LABELS: [(&str, Dosha); 3] = [("A", Dosha::Vata), ("B", Dosha::Pitta), ("C", Dosha::Kapha)];

type Row = (u32, &'static str, &'static str, [&'static str; 3]);

#[rustfmt::skip]
const STANDARD: &[Row] = &[
    (
        1,
        "Skin Texture",
        "How would you describe the general texture of your skin?",
        [
            "Naturally dry, thin, and can be rough",
            "Oily, soft, and prone to redness or moles",
            "Thick, moist, smooth, and supple",
        ],
    ),
    (
        2,
        "Skin Temperature",
        "How does your skin usually feel to the touch?",
        [
            "Cool or cold, especially hands and feet",
            "Warm or hot most of the time",
            "Pleasantly cool or neutral",
        ],
    ),
    (
        3,
        "Skin Sensitivity",
        "How sensitive is your skin to external factors?",
        [
            "Tends to crack, chap, or feel rough easily",
            "Sensitive, prone to acne, rashes, or inflammation",
            "Relatively resilient and rarely reacts to external changes",
        ],
    ),
    (
        4,
        "Sweating Tendency",
        "How much do you typically sweat during activity or heat?",
        [
            "Scant or very little sweating",
            "Profuse or high amount of sweating",
            "Moderate but steady sweating",
        ],
    ),
    (
        5,
        "Hair Texture",
        "What is the natural texture of your hair?",
        [
            "Dry, brittle, frizzy, or curly",
            "Fine, soft, oily, or straight",
            "Thick, oily, wavy, and lustrous",
        ],
    ),
    (
        6,
        "Hair Changes",
        "Have you noticed any early hair loss or greying?",
        [
            "Moderate thinning or breakage over time",
            "Early thinning, balding, or premature greying",
            "Very little hair loss or greying; hair remains thick",
        ],
    ),
    (
        7,
        "Scalp Condition",
        "How would you describe your scalp health?",
        [
            "Prone to dryness and small flakes (dandruff)",
            "Oily scalp with occasional redness or irritation",
            "Normal to oily, healthy and thick",
        ],
    ),
    (
        8,
        "Body Frame",
        "How would you describe your overall physical frame?",
        [
            "Thin, tall, or very short; petite frame",
            "Medium build; balanced proportions",
            "Large, broad, or stout frame",
        ],
    ),
    (
        9,
        "Weight Stability",
        "How easily does your weight fluctuate?",
        [
            "Difficult to gain weight; varies frequently",
            "Stable weight; can gain or lose with effort",
            "Gains weight easily and finds it hard to lose",
        ],
    ),
    (
        10,
        "Muscle Development",
        "How is your natural muscle tone and development?",
        [
            "Poorly developed; joints may be prominent",
            "Moderate development; flexible and defined",
            "Well-developed; sturdy and firm",
        ],
    ),
    (
        11,
        "Appetite Strength",
        "How would you describe your appetite?",
        [
            "Irregular; sometimes very hungry, sometimes not at all",
            "Strong and sharp; cannot skip meals",
            "Mild and constant; can comfortably skip meals",
        ],
    ),
    (
        12,
        "Digestion Speed",
        "How fast do you digest your food?",
        [
            "Unpredictable; sometimes fast, often gassy or bloated",
            "Fast digestion; hunger returns quickly",
            "Slow digestion; feel heavy for a long time after eating",
        ],
    ),
    (
        13,
        "Food Preference",
        "What type of food do you naturally crave or prefer?",
        [
            "Warm, cooked, and oily/moist foods",
            "Cooling, refreshing, and sweet foods",
            "Light, dry, and spicy foods",
        ],
    ),
    (
        14,
        "Bowel Regularity",
        "How regular are your bowel movements?",
        [
            "Irregular or prone to constipation",
            "Regular and frequent; sometimes loose",
            "Regular but slow; once a day usually",
        ],
    ),
    (
        15,
        "Daily Energy",
        "How is your energy level throughout the day?",
        [
            "Fluctuating; comes in bursts, tires easily",
            "Intense and focused; high endurance",
            "Steady and consistent; slow to start but long-lasting",
        ],
    ),
    (
        16,
        "Activity Preference",
        "What is your preferred pace for daily activities?",
        [
            "Fast-paced, always moving and doing multiple things",
            "Goal-oriented, competitive, and disciplined",
            "Relaxed, calm, and methodical",
        ],
    ),
    (
        17,
        "Sleep Pattern",
        "How do you describe your typical sleep?",
        [
            "Light, interrupted, or short duration",
            "Moderate duration; sound sleep",
            "Deep, heavy, and long duration; hard to wake up",
        ],
    ),
    (
        18,
        "Dream Activity",
        "What kind of dreams do you usually have?",
        [
            "Frequent dreams of flying, running, or movement",
            "Vivid, intense, or fiery dreams",
            "Few dreams; usually peaceful or watery",
        ],
    ),
    (
        19,
        "Climate Preference",
        "Which climate do you find most uncomfortable?",
        [
            "Cold and windy weather",
            "Hot and sunny weather",
            "Cold and damp/rainy weather",
        ],
    ),
    (
        20,
        "Thirst Frequency",
        "How often do you feel thirsty?",
        [
            "Varies; sometimes very thirsty, other times forget to drink",
            "Frequent thirst; need water regularly",
            "Rarely thirsty; can go long periods without water",
        ],
    ),
    (
        21,
        "Stress Response",
        "How do you typically react to stress?",
        [
            "Anxiety, worry, or fear",
            "Irritability, anger, or impatience",
            "Withdrawal, sadness, or stubbornness",
        ],
    ),
    (
        22,
        "Mood Stability",
        "How would you describe your general mood?",
        [
            "Changeable and spontaneous",
            "Sharp, intense, and purposeful",
            "Calm, steady, and forgiving",
        ],
    ),
    (
        23,
        "Learning Style",
        "How do you learn and remember information?",
        [
            "Learn quickly but forget quickly",
            "Sharp memory; focused and analytical",
            "Learn slowly but never forget",
        ],
    ),
    (
        24,
        "Decision-Making",
        "How do you usually make decisions?",
        [
            "Indecisive or change mind frequently",
            "Decisive and firm",
            "Deliberate, slow, and careful",
        ],
    ),
    (
        25,
        "Speech Pattern",
        "What is your typical way of speaking?",
        [
            "Fast, talkative, and sometimes scattered",
            "Sharp, precise, and authoritative",
            "Slow, melodious, and thoughtful",
        ],
    ),
];

impl QuestionSet {
    /// The built-in 25-question assessment.
    pub fn standard() -> QuestionSet {
        let questions = STANDARD
            .iter()
            .map(|(id, category, text, options)| Question {
                id: *id,
                category: (*category).to_string(),
                text: (*text).to_string(),
                options: LABELS
                    .iter()
                    .zip(options)
                    .map(|((label, dosha), text)| QuestionOption {
                        label: (*label).to_string(),
                        text: (*text).to_string(),
                        dosha: *dosha,
                    })
                    .collect(),
            })
            .collect();
        QuestionSet::from_trusted(questions)
    }
}
