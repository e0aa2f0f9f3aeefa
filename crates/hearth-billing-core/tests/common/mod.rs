pub mod mock_repos;
