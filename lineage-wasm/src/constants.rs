/// Element ids the host page provides. Missing elements are skipped.
pub const ID_CONTAINER: &str = "treeContainer";
pub const ID_SEARCH: &str = "searchInput";
pub const ID_PAPER: &str = "paperSel";
pub const ID_ZOOM_IN: &str = "zoomIn";
pub const ID_ZOOM_OUT: &str = "zoomOut";
pub const ID_EXPORT_PNG: &str = "exportPng";
pub const ID_EXPORT_PDF: &str = "exportPdf";
pub const ID_EXPORT_SVG: &str = "exportSvg";
pub const ID_OVERLAY: &str = "exportOverlay";
pub const ID_INFO_TOGGLE: &str = "infoToggle";
pub const ID_INFO_BODY: &str = "infoBody";

/// Bundled genealogy data.
pub const TREE_JSON: &str = include_str!("../../data/tree.json");

pub const LABEL_EXPORT_SVG: &str = "Xuất SVG";
pub const LABEL_SVG_LOADING: &str = "Đang tải sơ đồ...";
pub const LABEL_INFO_SHOWN: &str = "Ẩn ghi chú ▲";
pub const LABEL_INFO_HIDDEN: &str = "Hiện ghi chú ▼";
pub const OVERLAY_TEXT: &str = "Đang xử lý... Vui lòng chờ.";
pub const NOTICE_POPUP_BLOCKED: &str =
    "Trình duyệt đã chặn cửa sổ xem trước. Vui lòng cho phép cửa sổ bật lên rồi thử lại.";
pub const NOTICE_PDF_DOWNLOADED: &str =
    "Tệp PDF đã được tải xuống. Hãy mở bằng ứng dụng đọc PDF trên thiết bị.";

/// How long a preview's blob URL stays valid (ms).
pub const PREVIEW_URL_TTL_MS: u32 = 60_000;
