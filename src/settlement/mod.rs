pub mod allocator;
pub mod balance_book;
pub mod ledger;
pub mod record;

pub use allocator::{Allocation, SpendAllocator};
pub use balance_book::{BalanceBook, PayerPoints};
pub use ledger::Ledger;
pub use record::Record;
