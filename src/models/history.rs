/// One run of the numeral converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub id: Option<i64>,
    pub input: String,
    pub base: u32,
    pub value: u64,
    pub created_at: String,
}

impl Conversion {
    pub fn new(input: &str, base: u32, value: u64) -> Self {
        Self {
            id: None,
            input: input.to_string(),
            base,
            value,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub id: Option<i64>,
    pub score: u32,
    pub total: u32,
    pub taken_at: String,
}

impl QuizResult {
    pub fn new(score: u32, total: u32) -> Self {
        Self {
            id: None,
            score,
            total,
            taken_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl std::fmt::Display for QuizResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.score, self.total)
    }
}
