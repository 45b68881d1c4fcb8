pub mod guess_word;
