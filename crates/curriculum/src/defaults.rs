use crate::content::{Course, ExternalLink, ReadingItem, UniversityContent};

fn course(icon: &str, title: &str, description: &str, lessons: &str, level: &str) -> Course {
    Course {
        icon: icon.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        lessons: lessons.to_string(),
        level: level.to_string(),
    }
}

fn reading(title: &str, author: &str) -> ReadingItem {
    ReadingItem { title: title.to_string(), author: Some(author.to_string()) }
}

fn link(title: &str, url: &str) -> ExternalLink {
    ExternalLink { title: title.to_string(), url: url.to_string() }
}

pub fn default_courses() -> Vec<Course> {
    vec![
        course("📊", "Risk Management Fundamentals", "Learn the essential principles of position sizing, stop losses, and portfolio risk management.", "8 Lessons", "Beginner"),
        course("📈", "Technical Analysis Mastery", "Master chart patterns, indicators, and price action trading strategies.", "12 Lessons", "Intermediate"),
        course("🧠", "Trading Psychology", "Develop mental discipline, emotional control, and winning trading habits.", "10 Lessons", "All Levels"),
        course("💰", "Options Trading Strategies", "Understand options mechanics, spreads, and advanced trading strategies.", "15 Lessons", "Advanced"),
        course("🎯", "Building Trading Systems", "Create, backtest, and optimize profitable trading systems and strategies.", "10 Lessons", "Advanced"),
        course("📉", "Market Analysis & Research", "Develop skills in fundamental analysis, market research, and trade idea generation.", "9 Lessons", "Intermediate"),
    ]
}

pub fn default_reading_list() -> Vec<ReadingItem> {
    vec![
        reading("Trading in the Zone", "Mark Douglas"),
        reading("Market Wizards", "Jack Schwager"),
        reading("Reminiscences of a Stock Operator", "Edwin Lefèvre"),
        reading("The Disciplined Trader", "Mark Douglas"),
    ]
}

pub fn default_external_links() -> Vec<ExternalLink> {
    vec![
        link("TradingView: Charting Platform", "https://www.tradingview.com"),
        link("Finviz: Market Screener", "https://finviz.com"),
        link("Investopedia: Education", "https://www.investopedia.com"),
        link("SEC EDGAR: Filings", "https://www.sec.gov/edgar"),
    ]
}

impl UniversityContent {
    /// The built-in content shown until an administrator saves their own.
    pub fn defaults() -> Self {
        Self {
            courses: default_courses(),
            reading_list: default_reading_list(),
            external_links: default_external_links(),
        }
    }
}
