//! Trade history access port.

use crate::domain::error::TradescopeError;
use crate::domain::performance::PerformanceSnapshot;
use crate::domain::trade::TradeRecord;

pub trait TradePort {
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, TradescopeError>;

    /// The account snapshot, when the source carries one.
    fn fetch_performance(&self) -> Result<Option<PerformanceSnapshot>, TradescopeError> {
        Ok(None)
    }
}
