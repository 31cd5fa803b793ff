mod map_dto;

pub use map_dto::MapSceneQuery;
