pub mod seeder;

pub use seeder::{SeedReport, Seeder};
