use std::fmt;

use crate::models::trip::Mood;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Accommodation,
    Food,
    Transport,
    Activities,
    Miscellaneous,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Accommodation,
        Category::Food,
        Category::Transport,
        Category::Activities,
        Category::Miscellaneous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Accommodation => "Accommodation",
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Activities => "Activities",
            Category::Miscellaneous => "Miscellaneous",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Percentages in `Category::ALL` order; each row sums to 100.
pub fn percentages(mood: Mood) -> [u8; 5] {
    match mood {
        Mood::Relaxed => [35, 25, 20, 15, 5],
        Mood::Adventurous => [25, 20, 20, 30, 5],
        Mood::Romantic => [40, 25, 10, 20, 5],
        Mood::Cultural => [30, 25, 20, 20, 5],
        Mood::BudgetFriendly => [20, 30, 25, 15, 10],
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetLine {
    pub category: Category,
    pub percentage: u8,
    pub cost: f64,
}

impl BudgetLine {
    pub fn cost_display(&self) -> String {
        format_currency(self.cost)
    }

    pub fn percentage_display(&self) -> String {
        format!("{}%", self.percentage)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetAllocation {
    pub total: f64,
    pub mood: Mood,
    pub lines: Vec<BudgetLine>,
}

impl BudgetAllocation {
    pub fn total_percentage(&self) -> u32 {
        self.lines.iter().map(|line| u32::from(line.percentage)).sum()
    }
}

/// Splits `total` across the five categories using the mood's table.
pub fn allocate(total: f64, mood: Mood) -> BudgetAllocation {
    let lines = Category::ALL
        .into_iter()
        .zip(percentages(mood))
        .map(|(category, percentage)| BudgetLine {
            category,
            percentage,
            cost: total * f64::from(percentage) / 100.0,
        })
        .collect();
    BudgetAllocation { total, mood, lines }
}

pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}
