use derive_more::From;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable symbolic identity of a lazy operator, e.g. `aten::gather`.
#[derive(Debug, Clone, From, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct OpKind {
    symbol: String,
}

impl OpKind {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        self.symbol.as_str()
    }

    /// Namespace part of the symbol (`aten` for `aten::gather`).
    pub fn namespace(&self) -> &str {
        self.symbol.split_once("::").map(|(ns, _)| ns).unwrap_or("")
    }

    /// Unqualified operator name (`gather` for `aten::gather`).
    pub fn name(&self) -> &str {
        self.symbol
            .split_once("::")
            .map(|(_, name)| name)
            .unwrap_or(self.symbol.as_str())
    }
}

impl Display for OpKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl From<&str> for OpKind {
    fn from(symbol: &str) -> Self {
        OpKind::new(symbol)
    }
}

pub mod symbols {
    pub const DEVICE_DATA: &str = "prim::device_data";
    pub const GATHER: &str = "aten::gather";
    pub const SOFTMAX: &str = "aten::softmax";
    pub const SOFTMAX_BACKWARD: &str = "aten::_softmax_backward_data";
    pub const LOG_SOFTMAX_BACKWARD: &str = "aten::_log_softmax_backward_data";
    pub const MAX_POOL1D: &str = "aten::max_pool1d";
    pub const MAX_POOL2D: &str = "aten::max_pool2d";
    pub const MAX_POOL3D: &str = "aten::max_pool3d";
    pub const MAX_IN_DIM: &str = "aten::max";
    pub const GET_DIMENSIONS_SIZE: &str = "aten::size";
    pub const AS_STRIDED_VIEW_UPDATE: &str = "lazy::as_strided_view_update";
    pub const DIAGONAL_VIEW_UPDATE: &str = "lazy::diagonal_view_update";
    pub const NLL_LOSS_BACKWARD: &str = "aten::nll_loss_backward";
    pub const UPSAMPLE_NEAREST2D_BACKWARD: &str = "aten::upsample_nearest2d_backward";
}
