/*!

This is the long-form manual for `gen_ed_catalog` and `psu-gened`.

## Data files

All the commands read from a data directory (`data` by default, see `--data-dir`):

* `penn_state_courses.json` the course catalog
* `gen_ed_requirements.json` the Gen-Ed requirements
* `penn_state_majors.json` the majors

### Course catalog

Either a direct mapping from course code to record:

```json
{
  "ENGL 15": {"title": "Rhetoric and Composition", "attributes": {"gen_ed": ["GWS"]}}
}
```

or the same mapping wrapped under a `courses` entry, next to any other entries:

```json
{
  "generated": "2025-01-10",
  "courses": {"ENGL 15": {"attributes": {"gen_ed": ["GWS"]}}}
}
```

Both shapes are accepted by all the commands. When the catalog is rewritten, the shape,
the key order and non-ASCII text are kept as they were.

## Commands

### `add-attribute`

Adds a Gen-Ed tag to a list of courses. Without options it adds `GWS` to the Writing/Speaking
courses of the bulletin. Another list can be given with `--targets`:

```json
{"tag": "GQ", "courses": ["MATH 140", "STAT 200"]}
```

Every course of the list ends up in one of four groups:
- modified: the tag was added
- already has the tag: nothing to do
- ineligible: the record has no `attributes` or no `attributes.gen_ed`. The tool does not create them.
- not found: the code is not in the catalog

Before writing, the file is copied to `<file>.backup_<YYYYMMDD_HHMMSS>`. The new content is written to a temporary
file and moved into place. It is then read back: if it does not parse, the backup is copied back
and the command fails. `--dry-run` shows the difference without writing anything.

The exit code is 0 on success and 1 on any failure.

### `coverage`

Counts the courses for each Gen-Ed tag and checks that every requirement category can be satisfied.

### `analyze-majors`

Groups the majors by their `gen_ed_rules` entry, comparing the rules regardless of key order.

## Logging

Set `RUST_LOG` (for example `RUST_LOG=debug`) or pass `--verbose` to see the steps and the
decision taken for each course.

*/
