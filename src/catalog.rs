//! Immutable reference data: the question bank and the course catalog.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub duration: String,
    pub level: Level,
    pub modules: Vec<String>,
}

fn question(id: &str, prompt: &str, options: &[&str], correct: usize) -> Question {
    Question {
        id: id.to_string(),
        prompt: prompt.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct,
    }
}

pub fn question_bank() -> Vec<Question> {
    vec![
        question(
            "1",
            "What is the primary purpose of a stop-loss order?",
            &[
                "To guarantee profits",
                "To limit potential losses",
                "To increase trading volume",
                "To predict market trends",
            ],
            1,
        ),
        question(
            "2",
            "Which of the following best describes market volatility?",
            &[
                "The total volume of trades",
                "The speed of price movements",
                "The degree of price fluctuation",
                "The number of market participants",
            ],
            2,
        ),
        question(
            "3",
            "What does P/E ratio measure?",
            &[
                "Price to Earnings ratio",
                "Profit to Expense ratio",
                "Portfolio to Equity ratio",
                "Purchase to Exit ratio",
            ],
            0,
        ),
        question(
            "4",
            "In technical analysis, what does a \"bull market\" indicate?",
            &[
                "High trading volume",
                "Declining prices over time",
                "Rising prices over time",
                "Sideways price movement",
            ],
            2,
        ),
        question(
            "5",
            "What is diversification in investing?",
            &[
                "Investing all money in one stock",
                "Spreading investments across different assets",
                "Only buying technology stocks",
                "Trading only during market hours",
            ],
            1,
        ),
    ]
}

fn course(
    id: &str,
    title: &str,
    description: &str,
    price: f64,
    duration: &str,
    level: Level,
    modules: &[&str],
) -> Course {
    Course {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        price,
        duration: duration.to_string(),
        level,
        modules: modules.iter().map(|m| m.to_string()).collect(),
    }
}

pub fn course_catalog() -> Vec<Course> {
    vec![
        course(
            "basics",
            "Trading Fundamentals",
            "Master the essential concepts of trading, market analysis, and risk management. Perfect for beginners.",
            99.0,
            "8 hours",
            Level::Beginner,
            &[
                "Introduction to Financial Markets",
                "Order Types and Execution",
                "Basic Technical Analysis",
                "Risk Management Principles",
                "Market Psychology",
            ],
        ),
        course(
            "technical",
            "Technical Analysis Mastery",
            "Deep dive into chart patterns, indicators, and advanced technical analysis techniques.",
            199.0,
            "12 hours",
            Level::Intermediate,
            &[
                "Chart Patterns Recognition",
                "Technical Indicators",
                "Support and Resistance",
                "Trend Analysis",
                "Volume Analysis",
            ],
        ),
        course(
            "options",
            "Options Trading Strategies",
            "Learn advanced options strategies for income generation and portfolio protection.",
            299.0,
            "16 hours",
            Level::Advanced,
            &[
                "Options Fundamentals",
                "Greeks and Pricing",
                "Covered Calls",
                "Protective Puts",
                "Complex Strategies",
            ],
        ),
        course(
            "psychology",
            "Trading Psychology",
            "Develop the mental discipline and emotional control necessary for successful trading.",
            149.0,
            "6 hours",
            Level::Intermediate,
            &[
                "Emotional Control",
                "Discipline and Patience",
                "Fear and Greed Management",
                "Building Confidence",
                "Stress Management",
            ],
        ),
    ]
}
