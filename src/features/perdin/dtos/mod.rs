mod perdin_dto;

pub use perdin_dto::{
    ApprovalAction, ApprovalDto, CalculatePerdinDto, CreatePerdinDto, PerdinResponseDto,
    ReviewListQuery,
};
